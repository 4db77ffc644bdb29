//! End-to-end reconciliation scenarios.

use std::collections::BTreeMap;

use operator_core::reconcile::{PUSH_ENDPOINT_KEY, SCRAPE_JOBS_KEY};
use operator_core::{reconcile, ApplyAction, GatewayConfig, ReconcileContext};
use operator_shared_types::{UnitInfo, UnitStatus};
use relation_interface::{
    CertificatesData, IngressData, IntegrationKind, IntegrationRecord, IntegrationSnapshot,
    LogTarget,
};
use workload_interface::{ApplyOutcome, WorkloadRuntime};
use workload_runtime::MockWorkload;

fn unit() -> UnitInfo {
    UnitInfo {
        app_name: "pushgateway-k8s".to_string(),
        unit_name: "pushgateway-k8s/0".to_string(),
        address: "10.1.38.86".to_string(),
    }
}

fn context() -> ReconcileContext {
    ReconcileContext {
        unit: unit(),
        options: BTreeMap::new(),
        integrations: IntegrationSnapshot::new(),
        leader: true,
        workload_reachable: true,
        observed: None,
    }
}

fn set_option(ctx: &mut ReconcileContext, key: &str, value: &str) {
    ctx.options.insert(key.to_string(), value.to_string());
}

fn certificates_record() -> IntegrationRecord {
    IntegrationRecord::new()
        .with(CertificatesData::CA_CERT_KEY, "CA PEM")
        .with(CertificatesData::SERVER_CERT_KEY, "CERT PEM")
        .with(CertificatesData::PRIVATE_KEY_KEY, "KEY PEM")
}

fn ingress_record(url: &str) -> IntegrationRecord {
    IntegrationRecord::new().with(IngressData::URL_KEY, url)
}

#[test]
fn reconcile_is_deterministic() {
    let mut ctx = context();
    set_option(&mut ctx, GatewayConfig::LOG_LEVEL, "info");
    ctx.integrations
        .insert(IntegrationKind::Certificates, certificates_record());
    ctx.integrations
        .insert(IntegrationKind::Ingress, ingress_record("https://example/pg"));

    let first = reconcile(&ctx);
    let second = reconcile(&ctx);
    assert_eq!(first, second);
}

#[test]
fn persistence_flag_is_always_present() {
    for records in [
        Vec::new(),
        vec![(IntegrationKind::Certificates, certificates_record())],
        vec![(IntegrationKind::Ingress, ingress_record("https://example/pg"))],
    ] {
        let mut ctx = context();
        for (kind, record) in records {
            ctx.integrations.insert(kind, record);
        }
        let outcome = reconcile(&ctx);
        let desired = outcome.desired.expect("plan must be computed");
        assert!(
            desired.has_flag("--persistence.file"),
            "missing persistence flag in: {}",
            desired.command_line()
        );
        assert!(desired
            .command
            .contains(&"--persistence.file=/data/metrics".to_string()));
    }
}

#[test]
fn empty_inbound_set_yields_plain_http_plan() {
    let mut ctx = context();
    set_option(&mut ctx, GatewayConfig::LOG_LEVEL, "info");

    let outcome = reconcile(&ctx);
    let desired = outcome.desired.expect("plan must be computed");

    assert!(!desired.has_flag("--web.config.file"));
    assert!(!desired.has_flag("--web.route-prefix"));
    assert!(desired.files.is_empty());
    assert_eq!(outcome.apply, ApplyAction::Restart);
    assert!(matches!(outcome.status, UnitStatus::Maintenance(_)));

    // Once applied, the same inputs settle into active with no further apply.
    let mut settled = ctx.clone();
    settled.observed = Some(desired);
    let second = reconcile(&settled);
    assert_eq!(second.apply, ApplyAction::None);
    assert_eq!(second.status, UnitStatus::Active);
}

#[test]
fn tls_and_ingress_scenario() {
    let mut ctx = context();
    set_option(&mut ctx, GatewayConfig::LOG_LEVEL, "info");
    ctx.integrations
        .insert(IntegrationKind::Certificates, certificates_record());
    ctx.integrations
        .insert(IntegrationKind::Ingress, ingress_record("https://example/pg"));

    let outcome = reconcile(&ctx);
    let desired = outcome.desired.clone().expect("plan must be computed");

    assert!(desired.has_flag("--web.config.file"));
    assert!(desired
        .command
        .contains(&"--web.route-prefix=/pg".to_string()));
    assert_eq!(desired.files.len(), 4);

    // The catalogue entry advertises the ingress-rewritten URL.
    let catalogue = outcome
        .outbound_record(IntegrationKind::Catalogue)
        .expect("catalogue record");
    assert_eq!(catalogue.get("url"), Some("https://example/pg"));

    // Push endpoint switches to https once TLS is active.
    let push = outcome
        .outbound_record(IntegrationKind::PushEndpoint)
        .expect("push-endpoint record");
    let payload: serde_json::Value =
        serde_json::from_str(push.get(PUSH_ENDPOINT_KEY).unwrap()).unwrap();
    assert_eq!(payload["url"], "https://10.1.38.86:9091/");

    // Active only after the plan is observed as applied.
    assert!(matches!(outcome.status, UnitStatus::Maintenance(_)));
    let mut settled = ctx.clone();
    settled.observed = outcome.desired;
    assert_eq!(reconcile(&settled).status, UnitStatus::Active);
}

#[test]
fn explicit_route_prefix_wins_over_ingress() {
    let mut ctx = context();
    set_option(&mut ctx, GatewayConfig::WEB_ROUTE_PREFIX, "/custom");
    ctx.integrations
        .insert(IntegrationKind::Ingress, ingress_record("https://example/pg"));

    let desired = reconcile(&ctx).desired.expect("plan must be computed");
    assert!(desired
        .command
        .contains(&"--web.route-prefix=/custom".to_string()));
}

#[test]
fn unparseable_log_level_blocks() {
    let mut ctx = context();
    set_option(&mut ctx, GatewayConfig::LOG_LEVEL, "loud");

    let outcome = reconcile(&ctx);
    assert!(outcome.desired.is_none());
    assert!(outcome.outbound.is_empty());
    match outcome.status {
        UnitStatus::Blocked(message) => assert!(message.contains("log level")),
        other => panic!("expected blocked, got {:?}", other),
    }
}

#[test]
fn tls_required_but_certificates_missing_waits() {
    let mut ctx = context();
    set_option(&mut ctx, GatewayConfig::REQUIRE_TLS, "true");

    let outcome = reconcile(&ctx);
    assert!(matches!(outcome.status, UnitStatus::Waiting(_)));
    // No partial TLS configuration is ever produced.
    assert!(outcome.desired.is_none());
    assert_eq!(outcome.apply, ApplyAction::None);
}

#[test]
fn incomplete_certificates_record_counts_as_absent() {
    let mut ctx = context();
    set_option(&mut ctx, GatewayConfig::REQUIRE_TLS, "true");
    ctx.integrations.insert(
        IntegrationKind::Certificates,
        IntegrationRecord::new().with(CertificatesData::CA_CERT_KEY, "CA PEM"),
    );

    let outcome = reconcile(&ctx);
    assert!(matches!(outcome.status, UnitStatus::Waiting(_)));
}

#[test]
fn unreachable_workload_waits() {
    let mut ctx = context();
    ctx.workload_reachable = false;

    let outcome = reconcile(&ctx);
    assert!(matches!(outcome.status, UnitStatus::Waiting(_)));
    assert!(outcome.desired.is_none());
}

#[test]
fn conflicting_ingress_urls_block() {
    let mut ctx = context();
    ctx.integrations
        .insert(IntegrationKind::Ingress, ingress_record("https://a/pg"));
    ctx.integrations
        .insert(IntegrationKind::Ingress, ingress_record("https://b/pg"));

    let outcome = reconcile(&ctx);
    match outcome.status {
        UnitStatus::Blocked(message) => assert!(message.contains("ingress")),
        other => panic!("expected blocked, got {:?}", other),
    }
}

#[test]
fn duplicate_identical_ingress_records_are_fine() {
    let mut ctx = context();
    ctx.integrations
        .insert(IntegrationKind::Ingress, ingress_record("https://a/pg"));
    ctx.integrations
        .insert(IntegrationKind::Ingress, ingress_record("https://a/pg"));

    let outcome = reconcile(&ctx);
    assert!(matches!(
        outcome.status,
        UnitStatus::Maintenance(_) | UnitStatus::Active
    ));
}

#[test]
fn non_leader_publishes_nothing() {
    let mut ctx = context();
    ctx.leader = false;

    let outcome = reconcile(&ctx);
    assert!(outcome.outbound.is_empty());
    // The plan is still computed and applied on every unit.
    assert!(outcome.desired.is_some());
}

#[test]
fn leader_publishes_all_three_records() {
    let outcome = reconcile(&context());
    assert_eq!(outcome.outbound.len(), 3);

    let metrics = outcome
        .outbound_record(IntegrationKind::MetricsEndpoint)
        .expect("metrics-endpoint record");
    let jobs: serde_json::Value =
        serde_json::from_str(metrics.get(SCRAPE_JOBS_KEY).unwrap()).unwrap();
    assert_eq!(jobs[0]["static_configs"][0]["targets"][0], "*:9091");

    let push = outcome
        .outbound_record(IntegrationKind::PushEndpoint)
        .expect("push-endpoint record");
    let payload: serde_json::Value =
        serde_json::from_str(push.get(PUSH_ENDPOINT_KEY).unwrap()).unwrap();
    assert_eq!(payload["url"], "http://10.1.38.86:9091/");
}

#[test]
fn log_proxy_targets_feed_the_plan() {
    let mut ctx = context();
    ctx.integrations.insert(
        IntegrationKind::LogProxy,
        IntegrationRecord::new()
            .with(LogTarget::URL_KEY, "http://loki:3100/push")
            .with(LogTarget::NAME_KEY, "loki/0"),
    );

    let desired = reconcile(&ctx).desired.expect("plan must be computed");
    assert_eq!(
        desired.log_targets.get("loki/0").map(String::as_str),
        Some("http://loki:3100/push")
    );

    // A log target change alone must trigger a re-apply.
    let mut settled = ctx.clone();
    settled.observed = Some(desired);
    assert_eq!(reconcile(&settled).apply, ApplyAction::None);

    settled.integrations.insert(
        IntegrationKind::LogProxy,
        IntegrationRecord::new().with(LogTarget::URL_KEY, "http://loki2:3100/push"),
    );
    assert_eq!(reconcile(&settled).apply, ApplyAction::Restart);
}

#[tokio::test]
async fn reconcile_and_apply_round_trip() {
    let workload = MockWorkload::new();
    let mut ctx = context();
    set_option(&mut ctx, GatewayConfig::LOG_LEVEL, "debug");

    // First event: plan differs from the (empty) observed state.
    ctx.observed = workload.observed().await.unwrap();
    let outcome = reconcile(&ctx);
    assert_eq!(outcome.apply, ApplyAction::Restart);
    let plan = outcome.desired.expect("plan must be computed");
    assert!(matches!(
        workload.apply(&plan).await.unwrap(),
        ApplyOutcome::Restarted { .. }
    ));

    // Second event for an unrelated reason: nothing to do.
    ctx.observed = workload.observed().await.unwrap();
    let second = reconcile(&ctx);
    assert_eq!(second.apply, ApplyAction::None);
    assert_eq!(second.status, UnitStatus::Active);
    assert_eq!(workload.restart_count().await, 1);
}
