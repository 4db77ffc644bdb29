//! Reconciliation of declared integration state into workload configuration.
//!
//! `reconcile` is deterministic and side-effect free: it reads the context,
//! derives the desired container plan plus the records to publish, and
//! reports a status. Applying the plan and writing the bus records is the
//! host dispatcher's job.

use serde_json::json;
use tracing::debug;

use operator_shared_types::{OperatorError, Result, UnitStatus, HTTP_LISTEN_PORT};
use relation_interface::{
    CertificatesData, IngressData, IntegrationKind, IntegrationRecord, LogTarget,
};
use workload_interface::{WorkloadPlan, METRICS_PERSISTENCE_PATH};

use crate::config::GatewayConfig;
use crate::context::{ApplyAction, ReconcileContext, ReconcileOutcome};
use crate::tls;

/// Path of the pushgateway binary inside the workload image.
pub const PUSHGATEWAY_BINARY: &str = "/bin/pushgateway";

/// Relation data key carrying the push endpoint, fixed by the interface.
pub const PUSH_ENDPOINT_KEY: &str = "push-endpoint";

/// Relation data key carrying the scrape jobs, fixed by the interface.
pub const SCRAPE_JOBS_KEY: &str = "scrape-jobs";

/// Derive desired workload state, outbound integration data and unit status
/// from one host-supplied context.
pub fn reconcile(ctx: &ReconcileContext) -> ReconcileOutcome {
    let config = match GatewayConfig::from_options(&ctx.options) {
        Ok(config) => config,
        Err(err) => return ReconcileOutcome::blocked(err.to_string()),
    };

    let ingress = match ingress_data(ctx) {
        Ok(ingress) => ingress,
        Err(err) => return ReconcileOutcome::blocked(err.to_string()),
    };
    let certificates = match certificates_data(ctx) {
        Ok(certificates) => certificates,
        Err(err) => return ReconcileOutcome::blocked(err.to_string()),
    };

    if !ctx.workload_reachable {
        return ReconcileOutcome::waiting("waiting for the workload container");
    }

    if config.require_tls && certificates.is_none() {
        return ReconcileOutcome::waiting("waiting for a certificates integration");
    }

    let desired = build_plan(ctx, &config, ingress.as_ref(), certificates.as_ref());
    debug!(command = %desired.command_line(), "desired workload plan");

    // App-level relation data may only be written by the leader.
    let outbound = if ctx.leader {
        outbound_records(ctx, certificates.is_some(), ingress.as_ref())
    } else {
        Vec::new()
    };

    let (apply, status) = if ctx.observed.as_ref() == Some(&desired) {
        (ApplyAction::None, UnitStatus::Active)
    } else {
        (
            ApplyAction::Restart,
            UnitStatus::Maintenance("applying pushgateway configuration".to_string()),
        )
    };

    ReconcileOutcome {
        desired: Some(desired),
        apply,
        outbound,
        status,
    }
}

/// The single external URL, or a ConfigurationError when several ingress
/// integrations disagree. Records whose data has not arrived yet are
/// treated as absent.
fn ingress_data(ctx: &ReconcileContext) -> Result<Option<IngressData>> {
    let mut seen: Option<IngressData> = None;
    for record in ctx.integrations.of(IntegrationKind::Ingress) {
        let Some(data) = IngressData::from_record(record) else {
            continue;
        };
        match &seen {
            Some(existing) if *existing != data => {
                return Err(OperatorError::Configuration(format!(
                    "ingress integrations disagree on the external URL: `{}` vs `{}`",
                    existing.url, data.url
                )));
            }
            _ => seen = Some(data),
        }
    }
    Ok(seen)
}

/// The single set of certificate material, or a ConfigurationError when two
/// certificates integrations deliver different material.
fn certificates_data(ctx: &ReconcileContext) -> Result<Option<CertificatesData>> {
    let mut seen: Option<CertificatesData> = None;
    for record in ctx.integrations.of(IntegrationKind::Certificates) {
        let Some(data) = CertificatesData::from_record(record) else {
            continue;
        };
        match &seen {
            Some(existing) if *existing != data => {
                return Err(OperatorError::Configuration(
                    "certificates integrations deliver conflicting material".to_string(),
                ));
            }
            _ => seen = Some(data),
        }
    }
    Ok(seen)
}

fn build_plan(
    ctx: &ReconcileContext,
    config: &GatewayConfig,
    ingress: Option<&IngressData>,
    certificates: Option<&CertificatesData>,
) -> WorkloadPlan {
    let mut command = vec![
        PUSHGATEWAY_BINARY.to_string(),
        format!("--persistence.file={}", METRICS_PERSISTENCE_PATH),
        format!("--log.level={}", config.log_level),
    ];

    // Explicit configuration wins over the ingress-derived prefix.
    let route_prefix = config
        .web_route_prefix
        .clone()
        .or_else(|| ingress.and_then(|i| i.path().map(str::to_string)));
    if let Some(prefix) = route_prefix {
        command.push(format!("--web.route-prefix={}", prefix));
    }

    let mut plan = WorkloadPlan {
        command,
        ..Default::default()
    };

    if let Some(certs) = certificates {
        plan.command
            .push(format!("--web.config.file={}", tls::WEB_CONFIG_PATH));
        plan.files = tls::tls_files(certs);
    }

    for record in ctx.integrations.of(IntegrationKind::LogProxy) {
        if let Some(target) = LogTarget::from_record(record) {
            plan.log_targets.insert(target.label, target.url);
        }
    }

    plan
}

fn outbound_records(
    ctx: &ReconcileContext,
    tls_active: bool,
    ingress: Option<&IngressData>,
) -> Vec<(IntegrationKind, IntegrationRecord)> {
    let scheme = if tls_active { "https" } else { "http" };
    let internal_url = ctx.unit.internal_url(scheme, HTTP_LISTEN_PORT);

    // One scrape job over every unit of this application, as the scraping
    // side expands the `*` target.
    let scrape_jobs = json!([
        {
            "metrics_path": "/metrics",
            "static_configs": [{"targets": [format!("*:{}", HTTP_LISTEN_PORT)]}],
        }
    ]);
    let metrics = IntegrationRecord::new().with(SCRAPE_JOBS_KEY, scrape_jobs.to_string());

    let push = IntegrationRecord::new().with(
        PUSH_ENDPOINT_KEY,
        json!({"url": &internal_url}).to_string(),
    );

    let catalogue_url = ingress
        .map(|i| i.url.clone())
        .unwrap_or_else(|| internal_url.clone());
    let catalogue = IntegrationRecord::new()
        .with("name", "Prometheus Pushgateway")
        .with(
            "description",
            "Aggregation gateway for ephemeral and batch job metrics",
        )
        .with("url", catalogue_url);

    vec![
        (IntegrationKind::MetricsEndpoint, metrics),
        (IntegrationKind::PushEndpoint, push),
        (IntegrationKind::Catalogue, catalogue),
    ]
}
