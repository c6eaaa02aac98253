//! services/outreach_service.rs
//! Orquesta el ciclo: límite diario -> generar lista -> guardar -> marcar -> grabar.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;

use crate::config::sheet_config::{ADHOC_LIST_THROTTLE_KEY, DAILY_LIST_THROTTLE_KEY};
use crate::models::outreach_model::{
    AdhocMode, GenerateAdhocRequest, ListKind, ListStatus, OutreachList, ReconcileSummary,
    RequestContext,
};
use crate::services::list_service::ListService;
use crate::services::list_store_service::ListStoreService;
use crate::services::reconcile_service::ReconcileService;
use crate::services::throttle_service::ThrottleService;

/// Resultado de generar. Los casos distintos de `Generated` son avisos para el
/// operador: la acción se cancela sin efectos.
#[derive(Debug)]
pub enum GenerateOutcome {
    Generated {
        list: OutreachList,
        warning: Option<String>,
    },
    AlreadyGeneratedToday,
    Empty,
    Invalid(String),
}

#[derive(Debug)]
pub enum MarkOutcome {
    Updated(OutreachList),
    NotFound,
    AlreadyReconciled,
    LengthMismatch { expected: usize, got: usize },
}

#[derive(Debug)]
pub enum ReconcileOutcome {
    Applied {
        list_id: String,
        summary: ReconcileSummary,
    },
    NotFound,
    NothingMarked,
    AlreadyReconciled,
}

#[derive(Clone)]
pub struct OutreachService {
    lists: ListService,
    throttle: ThrottleService,
    reconciler: ReconcileService,
    store: ListStoreService,
    adhoc_default_total: usize,
    /// Serializa verificar-generar-registrar, y marcar frente a grabar, dentro de este proceso.
    cycle_lock: Arc<Mutex<()>>,
}

impl OutreachService {
    pub fn new(
        lists: ListService,
        throttle: ThrottleService,
        reconciler: ReconcileService,
        store: ListStoreService,
        adhoc_default_total: usize,
    ) -> Self {
        Self {
            lists,
            throttle,
            reconciler,
            store,
            adhoc_default_total,
            cycle_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn lists(&self) -> &ListService {
        &self.lists
    }

    pub async fn generate_daily(&self, ctx: RequestContext) -> Result<GenerateOutcome> {
        let _guard = self.cycle_lock.lock().await;

        if !self
            .throttle
            .can_generate_today(DAILY_LIST_THROTTLE_KEY, ctx.today, ctx.privileged)
            .await?
        {
            log::info!("(generate_daily) Lista diaria ya generada hoy ({}).", ctx.today);
            return Ok(GenerateOutcome::AlreadyGeneratedToday);
        }

        let entries = self.lists.daily_list(ctx.today).await?;
        if entries.is_empty() {
            return Ok(GenerateOutcome::Empty);
        }

        self.throttle
            .record_generation(DAILY_LIST_THROTTLE_KEY, ctx.today)
            .await?;
        let list = self
            .store
            .create_list(ListKind::Daily, ctx.today, entries)
            .await?;

        log::info!(
            "(generate_daily) Lista {} generada con {} contacto(s).",
            list.id,
            list.entries.len()
        );
        Ok(GenerateOutcome::Generated {
            list,
            warning: None,
        })
    }

    pub async fn generate_adhoc(
        &self,
        ctx: RequestContext,
        req: GenerateAdhocRequest,
    ) -> Result<GenerateOutcome> {
        let campaign = req.campaign.unwrap_or_default();
        let message = req.message.unwrap_or_default();
        let total = req.total.unwrap_or(self.adhoc_default_total);
        let status = req.status.unwrap_or_default().trim().to_string();

        if req.mode == AdhocMode::ByStatus {
            if status.is_empty() {
                return Ok(GenerateOutcome::Invalid("Status escolhido vazio.".to_string()));
            }
            if total == 0 {
                return Ok(GenerateOutcome::Invalid(
                    "O total pedido deve ser maior que zero.".to_string(),
                ));
            }
        }

        let _guard = self.cycle_lock.lock().await;

        if !self
            .throttle
            .can_generate_today(ADHOC_LIST_THROTTLE_KEY, ctx.today, ctx.privileged)
            .await?
        {
            log::info!("(generate_adhoc) Lista pontual ya generada hoy ({}).", ctx.today);
            return Ok(GenerateOutcome::AlreadyGeneratedToday);
        }

        let (entries, warning) = match req.mode {
            AdhocMode::Sheet => (
                self.lists.sheet_list(Some(&campaign), &message).await?,
                None,
            ),
            AdhocMode::ByStatus => {
                let entries = self
                    .lists
                    .priority_list(ctx.today, &status, total, &campaign, &message)
                    .await?;
                let warning = (entries.len() < total).then(|| {
                    format!(
                        "Só encontrei {} clientes elegíveis hoje no status '{}' (cooldown respeitado).",
                        entries.len(),
                        status
                    )
                });
                (entries, warning)
            }
        };

        if entries.is_empty() {
            return Ok(GenerateOutcome::Empty);
        }

        self.throttle
            .record_generation(ADHOC_LIST_THROTTLE_KEY, ctx.today)
            .await?;
        let list = self
            .store
            .create_list(ListKind::Adhoc, ctx.today, entries)
            .await?;

        log::info!(
            "(generate_adhoc) Lista {} generada con {} contacto(s).",
            list.id,
            list.entries.len()
        );
        Ok(GenerateOutcome::Generated { list, warning })
    }

    pub async fn get_list(&self, id: &str) -> Result<Option<OutreachList>> {
        self.store.get_list(id).await
    }

    /// Reemplaza la columna "enviado" completa, como el editor de la tabla.
    /// Toma el mismo candado que `reconcile`: no hay marcas nuevas mientras se graba.
    pub async fn mark(&self, id: &str, sent: &[bool]) -> Result<MarkOutcome> {
        let _guard = self.cycle_lock.lock().await;

        let Some(mut list) = self.store.get_list(id).await? else {
            return Ok(MarkOutcome::NotFound);
        };
        if list.status == ListStatus::Reconciled {
            return Ok(MarkOutcome::AlreadyReconciled);
        }
        if sent.len() != list.entries.len() {
            return Ok(MarkOutcome::LengthMismatch {
                expected: list.entries.len(),
                got: sent.len(),
            });
        }

        for (entry, flag) in list.entries.iter_mut().zip(sent) {
            entry.sent = *flag;
        }
        if !self.store.update_entries(id, &list.entries).await? {
            return Ok(MarkOutcome::AlreadyReconciled);
        }
        Ok(MarkOutcome::Updated(list))
    }

    pub async fn reconcile(&self, ctx: RequestContext, id: &str) -> Result<ReconcileOutcome> {
        let _guard = self.cycle_lock.lock().await;

        let Some(list) = self.store.get_list(id).await? else {
            return Ok(ReconcileOutcome::NotFound);
        };
        if list.status == ListStatus::Reconciled {
            return Ok(ReconcileOutcome::AlreadyReconciled);
        }
        if !list.entries.iter().any(|e| e.sent) {
            return Ok(ReconcileOutcome::NothingMarked);
        }

        let summary = self
            .reconciler
            .reconcile(&list.entries, |e| e.sent, ctx.today)
            .await?;
        self.store.mark_reconciled(id, &summary).await?;

        log::info!(
            "(reconcile) Lista {} grabada: {} en CRM, {} en LOG.",
            id,
            summary.updated_count,
            summary.logged_count
        );
        Ok(ReconcileOutcome::Applied {
            list_id: id.to_string(),
            summary,
        })
    }
}
