//! tests/list_tests.rs
//! Lista diaria (cupo por status + sorteo del día) y lista pontual (prioridad).

use super::{date, gateway, table};
use crate::config::sheet_config::SheetLayout;
use crate::models::customer_model::{CustomerRecord, StatusRule};
use crate::services::list_service::{
    build_daily_entries, build_priority_entries, build_sheet_entries, ListService,
};
use crate::services::memory_sheets::MemorySheetsBackend;

fn customer(phone: &str, status: &str, priority: f64, days: f64) -> CustomerRecord {
    CustomerRecord {
        row: 0,
        whatsapp: phone.to_string(),
        name: format!("Cliente {}", phone),
        status: status.to_string(),
        priority,
        days_inactive: days,
        total_orders: 0.0,
        next_allowed_contact: None,
        eligible: true,
    }
}

fn rule(status: &str, quantity: usize) -> StatusRule {
    StatusRule {
        status: status.to_string(),
        quantity_per_day: quantity,
        campaign: format!("CAMP_{}", status),
        message_template: "Olá".to_string(),
    }
}

/// 40 clientes del mismo status, para que el sorteo tenga margen.
fn crowd(status: &str) -> Vec<CustomerRecord> {
    (0..40)
        .map(|i| customer(&format!("8599999{:04}", i), status, 0.0, 0.0))
        .collect()
}

#[test]
fn four_statuses_one_each() {
    let customers = vec![
        customer("85999990001", "7-15", 1.0, 10.0),
        customer("85999990002", "16-30", 1.0, 20.0),
        customer("85999990003", "31-60", 1.0, 45.0),
        customer("85999990004", "61-90", 1.0, 75.0),
    ];
    let rules = vec![rule("7-15", 1), rule("16-30", 1), rule("31-60", 1), rule("61-90", 1)];

    let entries = build_daily_entries(&customers, &rules, date(2026, 1, 23), "55");
    assert_eq!(entries.len(), 4);
    let statuses: Vec<&str> = entries.iter().map(|e| e.status.as_str()).collect();
    assert_eq!(statuses, vec!["7-15", "16-30", "31-60", "61-90"]);
    for e in &entries {
        assert!(!e.link.is_empty());
        assert!(e.link.starts_with("https://wa.me/55"));
        assert!(!e.sent);
        assert_eq!(e.campaign, format!("CAMP_{}", e.status));
        assert_eq!(e.message, "Olá");
    }
}

#[test]
fn ineligible_and_cooling_down_never_selected() {
    let today = date(2026, 1, 23);
    let mut customers = crowd("7-15");
    for c in customers.iter_mut().take(20) {
        c.eligible = false;
    }
    for c in customers.iter_mut().skip(20).take(10) {
        c.next_allowed_contact = Some(date(2026, 1, 24));
    }
    let excluded: Vec<String> = customers.iter().take(30).map(|c| c.whatsapp.clone()).collect();

    let daily = build_daily_entries(&customers, &[rule("7-15", 40)], today, "55");
    assert_eq!(daily.len(), 10);
    assert!(daily.iter().all(|e| !excluded.contains(&e.whatsapp)));

    let adhoc = build_priority_entries(&customers, "7-15", 40, "C", "m", today, "55");
    assert_eq!(adhoc.len(), 10);
    assert!(adhoc.iter().all(|e| !excluded.contains(&e.whatsapp)));
}

#[test]
fn cooldown_ending_today_is_selectable() {
    let today = date(2026, 1, 23);
    let mut c = customer("85999990001", "7-15", 0.0, 0.0);
    c.next_allowed_contact = Some(today);
    let entries = build_daily_entries(&[c], &[rule("7-15", 1)], today, "55");
    assert_eq!(entries.len(), 1);
}

#[test]
fn same_day_same_sample() {
    let customers = crowd("31-60");
    let rules = vec![rule("31-60", 5)];
    let a = build_daily_entries(&customers, &rules, date(2026, 1, 23), "55");
    let b = build_daily_entries(&customers, &rules, date(2026, 1, 23), "55");
    assert_eq!(a.len(), 5);
    assert_eq!(a, b);
}

#[test]
fn sample_changes_across_days() {
    let customers = crowd("31-60");
    let rules = vec![rule("31-60", 5)];
    let base: Vec<String> = build_daily_entries(&customers, &rules, date(2026, 1, 1), "55")
        .into_iter()
        .map(|e| e.whatsapp)
        .collect();

    // 5 de 40: que diez días seguidos salga la misma muestra sería casualidad
    let differs = (2..=11).any(|d| {
        let other: Vec<String> = build_daily_entries(&customers, &rules, date(2026, 1, d), "55")
            .into_iter()
            .map(|e| e.whatsapp)
            .collect();
        other != base
    });
    assert!(differs);
}

#[test]
fn zero_quota_and_unknown_status_contribute_nothing() {
    let customers = vec![customer("85999990001", "7-15", 0.0, 0.0)];
    let entries = build_daily_entries(
        &customers,
        &[rule("7-15", 0), rule("SUMIDO", 3)],
        date(2026, 1, 23),
        "55",
    );
    assert!(entries.is_empty());
}

#[test]
fn fewer_candidates_than_quota_takes_all_in_sheet_order() {
    let customers = vec![
        customer("85999990001", "7-15", 0.0, 0.0),
        customer("85999990002", "7-15", 0.0, 0.0),
    ];
    let entries = build_daily_entries(&customers, &[rule("7-15", 5)], date(2026, 1, 23), "55");
    let phones: Vec<&str> = entries.iter().map(|e| e.whatsapp.as_str()).collect();
    assert_eq!(phones, vec!["85999990001", "85999990002"]);
}

#[test]
fn priority_list_is_sorted_and_stable() {
    let customers = vec![
        customer("85999990001", "ATIVO", 1.0, 50.0),
        customer("85999990002", "ATIVO", 3.0, 10.0),
        customer("85999990003", "ATIVO", 3.0, 30.0),
        customer("85999990004", "ATIVO", 2.0, 99.0),
        customer("85999990005", "INATIVO", 9.0, 99.0),
    ];
    let today = date(2026, 1, 23);
    let a = build_priority_entries(&customers, "ativo", 3, " CUPOM10 ", "Oi", today, "55");
    let phones: Vec<&str> = a.iter().map(|e| e.whatsapp.as_str()).collect();
    assert_eq!(phones, vec!["85999990003", "85999990002", "85999990004"]);
    assert!(a.iter().all(|e| e.campaign == "CUPOM10" && !e.sent));

    let b = build_priority_entries(&customers, "ativo", 3, " CUPOM10 ", "Oi", today, "55");
    assert_eq!(a, b);
}

#[test]
fn priority_list_drops_short_phones() {
    let customers = vec![
        customer("859999", "ATIVO", 9.0, 0.0),
        customer("8599990001", "ATIVO", 1.0, 0.0),
    ];
    let entries = build_priority_entries(&customers, "ATIVO", 10, "", "", date(2026, 1, 23), "55");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].whatsapp, "8599990001");
    assert_eq!(entries[0].link, "https://wa.me/558599990001");
}

#[test]
fn sheet_list_reads_flags_and_overrides_campaign() {
    let t = table(
        "LISTA_PONTUAL",
        &[
            &["WHATSAPP", "NOME", "STATUS", "CAMPANHA", "ENVIADO?"],
            &["(85) 99999-0001", "Ana", "ATIVO", "VELHA", "verdadeiro"],
            &["85999990002", "Bia", "INATIVO", "", "FALSE"],
            &["", "", "", "", ""],
        ],
    );
    let entries = build_sheet_entries(&t, Some("NOVA"), "Oi", "55").unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].whatsapp, "85999990001");
    assert!(entries[0].sent);
    assert!(!entries[1].sent);
    assert!(entries.iter().all(|e| e.campaign == "NOVA"));
    assert_eq!(entries[0].link, "https://wa.me/5585999990001?text=Oi");

    let kept = build_sheet_entries(&t, Some("  "), "", "55").unwrap();
    assert_eq!(kept[0].campaign, "VELHA");
}

#[test]
fn sheet_list_tolerates_missing_columns() {
    let t = table("LISTA_PONTUAL", &[&["WHATSAPP"], &["85999990001"]]);
    let entries = build_sheet_entries(&t, None, "", "55").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "");
    assert!(!entries[0].sent);
}

#[actix_rt::test]
async fn daily_list_from_demo_sheet() {
    let layout = SheetLayout::default();
    let backend = MemorySheetsBackend::with_demo_data(&layout).await;
    let service = ListService::new(gateway(&backend), layout, "55".to_string());

    let entries = service.daily_list(date(2026, 1, 23)).await.unwrap();
    assert_eq!(entries.len(), 4);
    assert_eq!(
        entries[0].link,
        "https://wa.me/5585999990001?text=Ol%C3%A1%21%20Sentimos%20sua%20falta."
    );
}

#[actix_rt::test]
async fn daily_list_fails_fast_on_missing_column() {
    let layout = SheetLayout::default();
    let backend = MemorySheetsBackend::with_demo_data(&layout).await;
    backend
        .set_sheet(
            &layout.crm_sheet,
            vec![vec!["WHATSAPP".to_string(), "NOME".to_string(), "STATUS".to_string()]],
        )
        .await;
    let service = ListService::new(gateway(&backend), layout, "55".to_string());

    let err = service.daily_list(date(2026, 1, 23)).await.unwrap_err();
    assert!(format!("{:#}", err).contains("ELEGIVEL"));
}

#[test]
fn short_year_cooldown_in_sheet_keeps_customer_out() {
    let t = table(
        "CRM_GERAL",
        &[
            &["WHATSAPP", "NOME", "STATUS", "ELEGIVEL", "PROXIMO CONTATO PERMITIDO"],
            &["85999990001", "Ana", "7-15", "SIM", "23/01/27"],
            &["85999990002", "Bia", "7-15", "SIM", "23/01/26"],
        ],
    );
    let customers = CustomerRecord::from_table(&t).unwrap();
    let today = date(2026, 6, 1);

    let daily = build_daily_entries(&customers, &[rule("7-15", 5)], today, "55");
    let phones: Vec<&str> = daily.iter().map(|e| e.whatsapp.as_str()).collect();
    assert_eq!(phones, vec!["85999990002"]);

    let priority = build_priority_entries(&customers, "7-15", 5, "", "", today, "55");
    assert_eq!(priority.len(), 1);
    assert_eq!(priority[0].whatsapp, "85999990002");
}
