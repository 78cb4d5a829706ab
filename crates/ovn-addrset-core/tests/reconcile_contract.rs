//! Contract Test: Reconciliation building blocks
//!
//! Exercises the store, the enumerator and the helpers together the way a
//! reconciler uses them: compute a semantic name, hash it, persist it, and
//! later enumerate what is stored to delete what is no longer wanted.
//!
//! Constraints verified:
//! - Hashed names are stable and valid identifiers
//! - Stored sets are found again by their semantic names
//! - Updates replace the address set contents
//! - Deletes are idempotent
//! - Failures reach the caller exactly once (no retries)

mod common;

use common::*;
use ovn_addrset_core::{
    AddressSetEnumerator, AddressSetStore, MemoryNorthbound, MutationOutcome, contains,
    extract_ip, extract_mac, hashed_address_set,
};
use std::collections::BTreeSet;
use std::sync::Arc;

fn setup() -> (Arc<MemoryNorthbound>, AddressSetStore, AddressSetEnumerator) {
    let nb = Arc::new(MemoryNorthbound::new());
    (
        nb.clone(),
        AddressSetStore::new(nb.clone()),
        AddressSetEnumerator::new(nb),
    )
}

#[tokio::test]
async fn created_set_is_enumerated_by_semantic_name() {
    let (_nb, store, enumerator) = setup();

    store
        .create_or_update("ns1.0", &hashed_address_set("ns1.0"), &["10.0.0.1"])
        .await
        .expect("create succeeds");

    let mut seen = Vec::new();
    enumerator
        .for_each_name(|name, namespace, suffix| {
            seen.push((name.to_string(), namespace.to_string(), suffix.to_string()));
        })
        .await
        .expect("enumeration succeeds");

    assert!(seen.contains(&("ns1.0".to_string(), "ns1".to_string(), "0".to_string())));
}

#[tokio::test]
async fn second_update_replaces_addresses() {
    let (nb, store, _) = setup();
    let hashed = hashed_address_set("ns1.0");

    store
        .create_or_update("ns1.0", &hashed, &["1.1.1.1", "2.2.2.2"])
        .await
        .expect("create succeeds");
    store
        .create_or_update("ns1.0", &hashed, &["3.3.3.3"])
        .await
        .expect("update succeeds");

    let record = nb.get(&hashed).await.expect("record exists");
    assert_eq!(record.addresses, BTreeSet::from(["3.3.3.3".to_string()]));
}

#[tokio::test]
async fn delete_of_missing_set_succeeds() {
    let (nb, store, _) = setup();

    store
        .delete(&hashed_address_set("never-created"))
        .await
        .expect("delete of a missing set succeeds");
    assert!(nb.is_empty().await);
}

#[tokio::test]
async fn repeated_ensure_is_idempotent() {
    let (nb, store, _) = setup();

    assert_eq!(
        store.ensure("ns1", &["10.0.0.1"]).await.unwrap(),
        MutationOutcome::Created
    );
    for _ in 0..3 {
        assert_eq!(
            store.ensure("ns1", &["10.0.0.1"]).await.unwrap(),
            MutationOutcome::Updated
        );
    }
    assert_eq!(nb.len().await, 1);
}

#[tokio::test]
async fn stale_sets_are_garbage_collected() {
    let (nb, store, enumerator) = setup();

    for name in ["ns1.allow", "ns1.deny", "ns2.allow", "ns3"] {
        store.ensure(name, &["10.0.0.1"]).await.unwrap();
    }

    let wanted = ["ns1.allow", "ns3"];
    let mut stale = Vec::new();
    enumerator
        .for_each_name(|name, _, _| {
            if !contains(&wanted, name) {
                stale.push(name.to_string());
            }
        })
        .await
        .unwrap();

    for name in &stale {
        store.delete(&hashed_address_set(name)).await.unwrap();
    }

    let mut remaining: Vec<String> = enumerator
        .names()
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.name)
        .collect();
    remaining.sort();
    assert_eq!(remaining, vec!["ns1.allow", "ns3"]);
    assert_eq!(nb.len().await, 2);
}

#[tokio::test]
async fn namespace_and_suffix_drive_cleanup_by_namespace() {
    let (_nb, store, enumerator) = setup();

    for name in ["gone.a", "gone.b", "kept.a"] {
        store.ensure::<&str>(name, &[]).await.unwrap();
    }

    let mut doomed = Vec::new();
    enumerator
        .for_each_name(|name, namespace, suffix| {
            if namespace == "gone" {
                doomed.push((name.to_string(), suffix.to_string()));
            }
        })
        .await
        .unwrap();
    doomed.sort();

    assert_eq!(
        doomed,
        vec![
            ("gone.a".to_string(), "a".to_string()),
            ("gone.b".to_string(), "b".to_string()),
        ]
    );
}

#[tokio::test]
async fn failures_are_returned_without_retry() {
    let nb = FailingNorthbound::new();
    let store = AddressSetStore::new(nb.clone());
    let enumerator = AddressSetEnumerator::new(nb.clone());

    assert!(store.ensure("ns1", &["10.0.0.1"]).await.is_err());
    assert_eq!(nb.call_count(), 1);

    assert!(store.set_addresses("a1", &["10.0.0.1"]).await.is_err());
    assert_eq!(nb.call_count(), 2);

    assert!(store.delete("a1").await.is_err());
    assert_eq!(nb.call_count(), 3);

    assert!(enumerator.for_each_name(|_, _, _| {}).await.is_err());
    assert_eq!(nb.call_count(), 4);
}

#[test]
fn hashed_names_are_stable_identifiers() {
    let names = ["ns1.0", "kube-system.allow-dns.egress", "", "a.b c"];
    for name in names {
        let hashed = hashed_address_set(name);
        assert_eq!(hashed, hashed_address_set(name));
        assert!(hashed.starts_with('a'));
        assert!(!hashed.contains('.'));
        assert!(!hashed.contains(char::is_whitespace));
    }
    assert_eq!(hashed_address_set("ns1.0"), "a16687120342526660291");
}

#[test]
fn pod_annotation_feeds_address_list() {
    let annotations = [
        r#"{"ip_address":"10.0.0.5/24","mac_address":"00:11:22:33:44:55"}"#,
        r#"{"ip_address":"not-a-cidr"}"#,
        "not json",
        "",
    ];

    let ips: Vec<String> = annotations
        .iter()
        .map(|a| extract_ip(a))
        .filter(|ip| !ip.is_empty())
        .collect();

    assert_eq!(ips, vec!["10.0.0.5"]);
    assert_eq!(extract_mac(annotations[0]), "00:11:22:33:44:55");
    assert!(contains(&ips, "10.0.0.5"));
    assert!(!contains(&ips, "10.0.0.6"));
}
