//! Batch issuance.

mod support;
use support::cfg;

#[tokio::test]
async fn batch_issues_contiguous_ids_sharing_one_batch_id() {
    let config = cfg("PO", 8, "%s%08d");
    let (issuer, _counter, audit) = support::issuer_for(&config).await;

    let batch = issuer.issue_batch("PO", 5, "erp", "alice", None).await.unwrap();

    let numbers: Vec<&str> = batch.ids.iter().map(|i| i.full_number.as_str()).collect();
    assert_eq!(
        numbers,
        vec!["PO00000001", "PO00000002", "PO00000003", "PO00000004", "PO00000005"]
    );

    let rows = audit.rows_for_prefix("PO");
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|r| r.batch_id == Some(batch.batch_id)));
}
