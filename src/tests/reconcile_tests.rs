//! tests/reconcile_tests.rs
//! Grabación de enviados en CRM_GERAL y LOG_ENVIO.

use super::{date, gateway, row, table};
use crate::config::sheet_config::SheetLayout;
use crate::error::GatewayError;
use crate::models::outreach_model::{LogEntry, OutreachEntry, ReconcileSummary};
use crate::models::sheet_model::CellUpdate;
use crate::services::memory_sheets::MemorySheetsBackend;
use crate::services::reconcile_service::{build_log_rows, plan_crm_updates, ReconcileService};

fn entry(phone: &str, status: &str, campaign: &str, sent: bool) -> OutreachEntry {
    OutreachEntry {
        whatsapp: phone.to_string(),
        name: String::new(),
        status: status.to_string(),
        campaign: campaign.to_string(),
        message: String::new(),
        link: String::new(),
        sent,
        priority: None,
        days_inactive: None,
        total_orders: None,
    }
}

async fn demo() -> (ReconcileService, MemorySheetsBackend, SheetLayout) {
    let layout = SheetLayout::default();
    let backend = MemorySheetsBackend::with_demo_data(&layout).await;
    (
        ReconcileService::new(gateway(&backend), layout.clone()),
        backend,
        layout,
    )
}

#[actix_rt::test]
async fn nothing_sent_is_a_noop_without_remote_calls() {
    let (service, backend, _) = demo().await;
    let entries = vec![entry("85999990001", "7-15", "C", false)];

    let summary = service
        .reconcile(&entries, |e| e.sent, date(2026, 1, 23))
        .await
        .unwrap();
    assert_eq!(summary, ReconcileSummary::default());
    assert_eq!(backend.call_count().await, 0);
}

#[actix_rt::test]
async fn updates_matching_rows_and_logs_every_sent_entry() {
    let (service, backend, layout) = demo().await;
    let entries = vec![
        entry("(85) 99999-0002", "16-30", "VOLTA_16", true),
        entry("85999990003", "31-60", "VOLTA_31", false),
        entry("11900000000", "7-15", "FANTASMA", true),
    ];

    let summary = service
        .reconcile(&entries, |e| e.sent, date(2026, 1, 23))
        .await
        .unwrap();
    assert_eq!(summary.updated_count, 1);
    assert_eq!(summary.logged_count, 2);

    let crm = backend.sheet(&layout.crm_sheet).await.unwrap();
    // ULTIMO CONTATO = col 8, CAMPANHA DO DIA = col 9 (1-based)
    assert_eq!(crm[2][7], "2026-01-23");
    assert_eq!(crm[2][8], "VOLTA_16");
    for untouched in [1, 3, 4] {
        assert_eq!(crm[untouched][7], "");
        assert_eq!(crm[untouched][8], "");
    }

    let log = backend.sheet(&layout.log_sheet).await.unwrap();
    assert_eq!(log.len(), 3);
    assert_eq!(log[1], row(&["2026-01-23", "85999990002", "16-30", "VOLTA_16"]));
    assert_eq!(log[2], row(&["2026-01-23", "11900000000", "7-15", "FANTASMA"]));
}

#[actix_rt::test]
async fn predicate_decides_what_is_sent() {
    let (service, backend, layout) = demo().await;
    let entries = vec![
        entry("85999990001", "7-15", "A", false),
        entry("85999990004", "61-90", "D", false),
    ];
    let summary = service
        .reconcile(&entries, |e| e.whatsapp.ends_with('4'), date(2026, 1, 23))
        .await
        .unwrap();
    assert_eq!(summary.updated_count, 1);
    let crm = backend.sheet(&layout.crm_sheet).await.unwrap();
    assert_eq!(crm[4][8], "D");
    assert_eq!(crm[1][8], "");
}

#[actix_rt::test]
async fn protected_sheet_surfaces_permission_error() {
    let (service, backend, layout) = demo().await;
    backend.protect(&layout.crm_sheet).await;
    let entries = vec![entry("85999990001", "7-15", "A", true)];

    let err = service
        .reconcile(&entries, |e| e.sent, date(2026, 1, 23))
        .await
        .unwrap_err();
    let gateway_err = err
        .chain()
        .find_map(|c| c.downcast_ref::<GatewayError>())
        .expect("error de la planilla");
    assert!(matches!(gateway_err, GatewayError::Protected { .. }));
    assert!(gateway_err.protected_hint().is_some());

    // no se llegó al LOG
    let log = backend.sheet(&layout.log_sheet).await.unwrap();
    assert_eq!(log.len(), 1);
}

#[test]
fn plan_requires_contact_columns() {
    let t = table("CRM_GERAL", &[&["WHATSAPP", "ULTIMO CONTATO"], &["85999990001", ""]]);
    let e = entry("85999990001", "7-15", "A", true);
    let err = plan_crm_updates(&t, &[&e], date(2026, 1, 23)).unwrap_err();
    assert!(matches!(err, GatewayError::MissingColumn { ref column, .. } if column == "CAMPANHA DO DIA"));
}

#[test]
fn plan_targets_sheet_rows() {
    let t = table(
        "CRM_GERAL",
        &[
            &["CAMPANHA DO DIA", "WHATSAPP", "ULTIMO CONTATO"],
            &["", "85 99999 0001", ""],
            &["", "", ""],
            &["", "85999990003", ""],
        ],
    );
    let e = entry("85999990003", "7-15", " CUPOM ", true);
    let (cells, matched) = plan_crm_updates(&t, &[&e], date(2026, 1, 23)).unwrap();
    assert_eq!(matched, 1);
    assert_eq!(
        cells,
        vec![CellUpdate::new(4, 3, "2026-01-23"), CellUpdate::new(4, 1, "CUPOM")]
    );
}

#[test]
fn log_rows_follow_header_names() {
    let t = table(
        "LOG_ENVIO",
        &[&["CAMPANHA", "", "WHATSAPP", "DATA ENVIO", "STATUS DO DIA", "OBS"]],
    );
    let rows = build_log_rows(
        &t.header,
        &[LogEntry {
            date: date(2026, 1, 23),
            whatsapp: "85999990001".to_string(),
            status: "7-15".to_string(),
            campaign: "VOLTA".to_string(),
        }],
    )
    .unwrap();
    assert_eq!(rows, vec![row(&["VOLTA", "", "85999990001", "2026-01-23", "7-15", ""])]);
}

#[test]
fn log_rows_require_columns() {
    let t = table("LOG_ENVIO", &[&["DATA ENVIO", "WHATSAPP"]]);
    assert!(matches!(
        build_log_rows(&t.header, &[]),
        Err(GatewayError::MissingColumn { .. })
    ));
}
