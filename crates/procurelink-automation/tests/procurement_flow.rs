use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use procurelink_automation::{
    AutomationEngine, ProcurementService, StepKind, StepStatus,
};
use procurelink_core::events::default_hooks;
use procurelink_core::model::{
    Attachment, MaintenanceRecord, NewAttachment, NewMaintenance, OwnerRef, Plant,
    ProcurementKey, ProcurementKind, ProcurementRecord, PurchaseOrder, Rfq, RfqStatus, Supplier,
    SupplierQuoteRequest, TargetRecord, Vehicle,
};
use procurelink_core::{
    Category, KeywordRules, NO_TARGET_LINKED, Target, TargetInput, TargetKind, TargetRegistry,
    TargetTypeConfig,
};
use procurelink_db_memory::InMemoryStorage;
use procurelink_notifications::{DynMailer, OutboxMailer, RfqComposer};
use procurelink_storage::{DynStorage, ProcurementStorage, StorageError, StorageStats};

/// In-memory storage whose reads or writes can be switched to fail.
#[derive(Default)]
struct FlakyStorage {
    inner: InMemoryStorage,
    fail_procurement_reads: AtomicBool,
    fail_attachment_writes: AtomicBool,
    fail_target_writes: AtomicBool,
}

impl FlakyStorage {
    fn check(flag: &AtomicBool) -> Result<(), StorageError> {
        if flag.load(Ordering::SeqCst) {
            Err(StorageError::internal("storage unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProcurementStorage for FlakyStorage {
    async fn get_target(&self, target: Target) -> Result<Option<TargetRecord>, StorageError> {
        self.inner.get_target(target).await
    }

    async fn list_targets(&self, kind: TargetKind) -> Result<Vec<TargetRecord>, StorageError> {
        self.inner.list_targets(kind).await
    }

    async fn save_target(&self, record: TargetRecord) -> Result<TargetRecord, StorageError> {
        Self::check(&self.fail_target_writes)?;
        self.inner.save_target(record).await
    }

    async fn get_procurement(
        &self,
        key: ProcurementKey,
    ) -> Result<Option<ProcurementRecord>, StorageError> {
        Self::check(&self.fail_procurement_reads)?;
        self.inner.get_procurement(key).await
    }

    async fn save_procurement(
        &self,
        record: ProcurementRecord,
    ) -> Result<ProcurementRecord, StorageError> {
        self.inner.save_procurement(record).await
    }

    async fn delete_procurement(&self, key: ProcurementKey) -> Result<(), StorageError> {
        self.inner.delete_procurement(key).await
    }

    async fn list_procurements(
        &self,
        kind: ProcurementKind,
    ) -> Result<Vec<ProcurementRecord>, StorageError> {
        self.inner.list_procurements(kind).await
    }

    async fn get_supplier(&self, id: u64) -> Result<Option<Supplier>, StorageError> {
        self.inner.get_supplier(id).await
    }

    async fn save_supplier(&self, supplier: Supplier) -> Result<Supplier, StorageError> {
        self.inner.save_supplier(supplier).await
    }

    async fn upsert_quote_request(
        &self,
        request: SupplierQuoteRequest,
    ) -> Result<SupplierQuoteRequest, StorageError> {
        self.inner.upsert_quote_request(request).await
    }

    async fn quote_requests(&self, rfq_id: u64) -> Result<Vec<SupplierQuoteRequest>, StorageError> {
        self.inner.quote_requests(rfq_id).await
    }

    async fn attachments_for(&self, owner: OwnerRef) -> Result<Vec<Attachment>, StorageError> {
        self.inner.attachments_for(owner).await
    }

    async fn add_attachment(&self, attachment: NewAttachment) -> Result<Attachment, StorageError> {
        Self::check(&self.fail_attachment_writes)?;
        self.inner.add_attachment(attachment).await
    }

    async fn create_maintenance(
        &self,
        maintenance: NewMaintenance,
    ) -> Result<MaintenanceRecord, StorageError> {
        self.inner.create_maintenance(maintenance).await
    }

    async fn get_maintenance(&self, id: u64) -> Result<Option<MaintenanceRecord>, StorageError> {
        self.inner.get_maintenance(id).await
    }

    async fn find_maintenance_by_source(
        &self,
        vehicle_id: u64,
        order_id: u64,
    ) -> Result<Option<MaintenanceRecord>, StorageError> {
        self.inner.find_maintenance_by_source(vehicle_id, order_id).await
    }

    async fn maintenance_for_vehicle(
        &self,
        vehicle_id: u64,
    ) -> Result<Vec<MaintenanceRecord>, StorageError> {
        self.inner.maintenance_for_vehicle(vehicle_id).await
    }

    async fn stats(&self) -> Result<StorageStats, StorageError> {
        self.inner.stats().await
    }

    fn backend_name(&self) -> &'static str {
        "flaky"
    }
}

struct Harness {
    storage: DynStorage,
    outbox: Arc<OutboxMailer>,
    service: ProcurementService,
}

async fn harness_with(registry: TargetRegistry, outbox: OutboxMailer) -> Harness {
    harness_on(Arc::new(InMemoryStorage::new()), registry, outbox).await
}

async fn harness_on(storage: DynStorage, registry: TargetRegistry, outbox: OutboxMailer) -> Harness {
    storage
        .save_target(TargetRecord::Vehicle(
            Vehicle::new(7, "AB123CD").with_make("Fiat", "Ducato"),
        ))
        .await
        .unwrap();
    storage
        .save_target(TargetRecord::Plant(Plant::new(2, "Sede Nord")))
        .await
        .unwrap();
    storage
        .save_supplier(Supplier::new(4, "Officina Rossi").with_email("officina@rossi.it"))
        .await
        .unwrap();
    storage
        .save_supplier(Supplier::new(5, "Gomme Bianchi"))
        .await
        .unwrap();

    let outbox = Arc::new(outbox);
    let mailer: DynMailer = outbox.clone();
    let engine = AutomationEngine::new(Arc::new(registry), storage.clone(), mailer);
    let hooks = default_hooks(KeywordRules::default()).await;
    let service = ProcurementService::new(Arc::new(engine), Arc::new(hooks));

    Harness {
        storage,
        outbox,
        service,
    }
}

async fn harness() -> Harness {
    harness_with(TargetRegistry::with_common_targets(), OutboxMailer::new()).await
}

fn amount(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

#[tokio::test]
async fn test_maintenance_order_creates_ticket_and_files_order() {
    let h = harness().await;
    let order = PurchaseOrder::new("PO-2024-001", 4, amount("250.00"))
        .with_description("Tagliando e manutenzione ordinaria")
        .with_target(Target::Vehicle(7));

    let outcome = h.service.save(order.into()).await.unwrap();
    assert!(outcome.created);
    assert!(outcome.target_changed);
    let report = outcome.automation.expect("automation should run");
    assert!(report.is_success(), "{:?}", report.steps);
    assert!(report.categories.contains(&Category::Maintenance));

    let maintenance_id = report.maintenance_record_id.expect("maintenance created");
    let maintenance = h
        .storage
        .get_maintenance(maintenance_id)
        .await
        .unwrap()
        .unwrap();
    let key = outcome.record.key().unwrap();
    assert_eq!(maintenance.vehicle_id, 7);
    assert_eq!(maintenance.cost, amount("250.00"));
    assert_eq!(maintenance.source_order_id, Some(key.id));
    assert_eq!(maintenance.description, "Manutenzione da ordine PO-2024-001");

    let on_ticket = h
        .storage
        .attachments_for(OwnerRef::maintenance(maintenance_id))
        .await
        .unwrap();
    assert_eq!(on_ticket.len(), 1);
    assert_eq!(on_ticket[0].title, "Ordine di Acquisto PO-2024-001");
    assert!(on_ticket[0].description.contains("Officina Rossi"));

    let on_vehicle = h
        .storage
        .attachments_for(Target::Vehicle(7).into())
        .await
        .unwrap();
    assert!(on_vehicle
        .iter()
        .any(|a| a.title == "Ordine di Acquisto PO-2024-001"));

    let vehicle = h.storage.get_target(Target::Vehicle(7)).await.unwrap().unwrap();
    assert!(vehicle.modified_at().is_some());
}

#[tokio::test]
async fn test_pipeline_runs_once_per_target_change() {
    let h = harness().await;
    let order = PurchaseOrder::new("PO-7", 4, amount("80")).with_target(Target::Vehicle(7));

    let first = h.service.save(order.into()).await.unwrap();
    assert!(first.automation_ran());
    assert_eq!(h.service.engine().runs(), 1);

    let mut record = first.record;
    if let ProcurementRecord::PurchaseOrder(order) = &mut record {
        order.description = "Consegna urgente".to_string();
    }
    let second = h.service.save(record).await.unwrap();
    assert!(!second.created);
    assert!(!second.target_changed);
    assert!(!second.automation_ran());
    assert_eq!(h.service.engine().runs(), 1);

    let key = second.record.key().unwrap();
    let moved = h
        .service
        .attach_target(key, Target::Plant(2), None)
        .await
        .unwrap();
    assert!(moved.automation_ran());
    assert_eq!(h.service.engine().runs(), 2);
}

#[tokio::test]
async fn test_detach_clears_target_without_automation() {
    let h = harness().await;
    let order = PurchaseOrder::new("PO-8", 4, amount("10")).with_target(Target::Plant(2));
    let key = h.service.save(order.into()).await.unwrap().record.key().unwrap();
    assert_eq!(h.service.engine().runs(), 1);

    let outcome = h.service.detach_target(key).await.unwrap();
    assert!(outcome.target_changed);
    assert!(!outcome.automation_ran());
    assert_eq!(outcome.record.target(), None);
    assert_eq!(h.service.engine().runs(), 1);
    assert_eq!(
        h.service
            .resolver()
            .target_display_name(outcome.record.target())
            .await,
        NO_TARGET_LINKED
    );
}

#[tokio::test]
async fn test_unregistered_target_is_rejected_before_storage() {
    let registry = TargetRegistry::from_types([TargetTypeConfig::new(
        TargetKind::Vehicle,
        "Automezzo",
    )]);
    let h = harness_with(registry, OutboxMailer::new()).await;

    let rfq = Rfq::new("RFQ-1", "Pulizia uffici").with_target(Target::Plant(2));
    let err = h.service.save(rfq.into()).await.unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("plant"), "{err}");
    assert!(err.to_string().contains("vehicle"), "{err}");
    assert_eq!(h.storage.stats().await.unwrap().rfqs, 0);

    let err = h
        .service
        .save_input(Rfq::new("RFQ-2", "Varie").into(), &TargetInput::new("boat", 1))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("boat"), "{err}");
}

#[tokio::test]
async fn test_incomplete_target_input_is_rejected() {
    let h = harness().await;
    let input = TargetInput {
        target_type: Some("vehicle".to_string()),
        target_id: None,
    };
    let err = h
        .service
        .save_input(Rfq::new("RFQ-3", "Varie").into(), &input)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("incomplete"), "{err}");

    let outcome = h
        .service
        .save_input(Rfq::new("RFQ-4", "Varie").into(), &TargetInput::new("vehicle", 7))
        .await
        .unwrap();
    assert_eq!(outcome.record.target(), Some(Target::Vehicle(7)));
}

#[tokio::test]
async fn test_documents_copied_once() {
    let h = harness().await;
    let order = PurchaseOrder::new("PO-9", 4, amount("400")).with_description("Pneumatici");
    let key = h.service.save(order.into()).await.unwrap().record.key().unwrap();

    for title in ["Preventivo gomme", "Preventivo gomme", "Libretto"] {
        let file = format!("docs/{}.pdf", title.to_lowercase().replace(' ', "_"));
        h.service
            .add_attachment(key, NewAttachment::new(key, title).with_file(file))
            .await
            .unwrap();
    }
    h.storage
        .add_attachment(NewAttachment::new(Target::Vehicle(7), "Libretto").with_file("docs/libretto.pdf"))
        .await
        .unwrap();

    let outcome = h
        .service
        .attach_target(key, Target::Vehicle(7), None)
        .await
        .unwrap();
    let report = outcome.automation.unwrap();
    assert_eq!(report.attachments_copied, 1);

    let on_vehicle = h
        .storage
        .attachments_for(Target::Vehicle(7).into())
        .await
        .unwrap();
    assert_eq!(on_vehicle.len(), 2);
    let copied = on_vehicle
        .iter()
        .find(|a| a.title == "Preventivo gomme")
        .unwrap();
    assert_eq!(copied.description, "Allegato automatico da Ordine di acquisto #1");

    h.service.detach_target(key).await.unwrap();
    let again = h
        .service
        .attach_target(key, Target::Vehicle(7), None)
        .await
        .unwrap();
    assert_eq!(again.automation.unwrap().attachments_copied, 0);
    assert_eq!(
        h.storage
            .attachments_for(Target::Vehicle(7).into())
            .await
            .unwrap()
            .len(),
        2
    );
}

#[tokio::test]
async fn test_record_flag_disables_document_copy() {
    let h = harness().await;
    let order = PurchaseOrder::new("PO-10", 4, amount("15"));
    let key = h.service.save(order.into()).await.unwrap().record.key().unwrap();
    h.service
        .add_attachment(key, NewAttachment::new(key, "Fattura"))
        .await
        .unwrap();

    let outcome = h
        .service
        .attach_target(key, Target::Plant(2), Some(false))
        .await
        .unwrap();
    let report = outcome.automation.unwrap();
    assert_eq!(
        report.step(StepKind::DocumentAttach).map(|s| s.status),
        Some(StepStatus::Skipped)
    );
    assert!(!outcome.record.auto_attach_documents());
    assert!(h
        .storage
        .attachments_for(Target::Plant(2).into())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_rfq_emails_linked_suppliers() {
    let h = harness().await;
    let rfq = Rfq::new("RFQ-2024-005", "Pneumatici invernali")
        .with_suppliers([4, 5, 99])
        .with_target(Target::Vehicle(7));

    let outcome = h.service.save(rfq.into()).await.unwrap();
    let report = outcome.automation.unwrap();
    assert_eq!(report.emails_sent, 1);
    assert_eq!(
        report.step(StepKind::Notification).map(|s| s.status),
        Some(StepStatus::Completed)
    );

    let messages = h.outbox.messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].to, vec!["officina@rossi.it".to_string()]);
    assert_eq!(
        messages[0].subject,
        "Richiesta Preventivo - Pneumatici invernali - Automezzo AB123CD"
    );

    let ProcurementRecord::Rfq(stored) = &outcome.record else {
        panic!("expected an RFQ");
    };
    assert_eq!(stored.status, RfqStatus::SentToSuppliers);
    assert!(stored.sent_to_suppliers_at.is_some());

    let requests = h.storage.quote_requests(stored.id.unwrap()).await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].supplier_id, 4);
    assert!(requests[0].email_sent);
}

#[tokio::test]
async fn test_failed_delivery_does_not_stop_pipeline() {
    let h = harness_with(
        TargetRegistry::with_common_targets(),
        OutboxMailer::rejecting(["officina@rossi.it"]),
    )
    .await;
    let rfq = Rfq::new("RFQ-6", "Revisione impianto")
        .with_suppliers([4])
        .with_target(Target::Plant(2));

    let outcome = h.service.save(rfq.into()).await.unwrap();
    let report = outcome.automation.unwrap();
    assert_eq!(
        report.step(StepKind::Notification).map(|s| s.status),
        Some(StepStatus::Failed)
    );
    assert_eq!(
        report.step(StepKind::RelatedState).map(|s| s.status),
        Some(StepStatus::Completed)
    );
    assert_eq!(report.steps.len(), StepKind::ALL.len());
    assert!(h.outbox.is_empty().await);

    let ProcurementRecord::Rfq(stored) = &outcome.record else {
        panic!("expected an RFQ");
    };
    assert_eq!(stored.status, RfqStatus::Draft);
}

#[tokio::test]
async fn test_missing_target_skips_every_step() {
    let h = harness().await;
    let order = PurchaseOrder::new("PO-11", 4, amount("5")).with_target(Target::Vehicle(404));

    let outcome = h.service.save(order.into()).await.unwrap();
    let report = outcome.automation.unwrap();
    assert!(report
        .steps
        .iter()
        .all(|s| s.status == StepStatus::Skipped));
    assert_eq!(report.maintenance_record_id, None);
}

#[tokio::test]
async fn test_metadata_sync_fills_empty_target_notes() {
    let h = harness().await;
    let mut order = PurchaseOrder::new("PO-12", 4, amount("60")).with_target(Target::Plant(2));
    order.internal_notes = "Consegna al magazzino B".to_string();

    h.service.save(order.into()).await.unwrap();
    let plant = h.storage.get_target(Target::Plant(2)).await.unwrap().unwrap();
    assert!(plant.notes().starts_with("Collegato a"), "{}", plant.notes());
}

#[tokio::test]
async fn test_metadata_sync_keeps_existing_target_notes() {
    let h = harness().await;
    let mut plant = TargetRecord::Plant(Plant::new(3, "Sede Sud"));
    plant.set_notes("Accesso dal cancello 2");
    h.storage.save_target(plant).await.unwrap();

    let mut order = PurchaseOrder::new("PO-14", 4, amount("60")).with_target(Target::Plant(3));
    order.internal_notes = "Consegna al magazzino B".to_string();

    let report = h.service.save(order.into()).await.unwrap().automation.unwrap();
    let step = report.step(StepKind::MetadataSync).unwrap();
    assert_eq!(step.status, StepStatus::Completed);
    assert_eq!(step.detail, "target notes kept");

    let plant = h.storage.get_target(Target::Plant(3)).await.unwrap().unwrap();
    assert_eq!(plant.notes(), "Accesso dal cancello 2");
}

#[tokio::test]
async fn test_category_scan_ignores_title() {
    let h = harness().await;
    let rfq = Rfq::new("RFQ-9", "Revisione freni").with_target(Target::Vehicle(7));

    let report = h.service.save(rfq.into()).await.unwrap().automation.unwrap();
    assert!(report.categories.is_empty());
    let step = report.step(StepKind::CategoryWorkflow).unwrap();
    assert_eq!(step.status, StepStatus::Completed);
    assert_eq!(step.detail, "no category detected");
}

#[tokio::test]
async fn test_save_succeeds_when_reload_fails() {
    let flaky = Arc::new(FlakyStorage::default());
    let h = harness_on(
        flaky.clone(),
        TargetRegistry::with_common_targets(),
        OutboxMailer::new(),
    )
    .await;
    flaky.fail_procurement_reads.store(true, Ordering::SeqCst);

    let order = PurchaseOrder::new("PO-15", 4, amount("300"))
        .with_description("Manutenzione tagliando")
        .with_target(Target::Vehicle(7));
    let outcome = h.service.save(order.into()).await.unwrap();

    assert!(outcome.created);
    assert_eq!(outcome.record.key(), Some(ProcurementKey::purchase_order(1)));
    let report = outcome.automation.unwrap();
    assert!(report.maintenance_record_id.is_some());

    let orders = flaky
        .list_procurements(ProcurementKind::PurchaseOrder)
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(flaky.maintenance_for_vehicle(7).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_attachment_write_failure_is_isolated_to_its_step() {
    let flaky = Arc::new(FlakyStorage::default());
    let h = harness_on(
        flaky.clone(),
        TargetRegistry::with_common_targets(),
        OutboxMailer::new(),
    )
    .await;
    let order = PurchaseOrder::new("PO-16", 4, amount("90")).with_description("Pneumatici");
    let key = h.service.save(order.into()).await.unwrap().record.key().unwrap();
    h.service
        .add_attachment(key, NewAttachment::new(key, "Preventivo gomme"))
        .await
        .unwrap();

    flaky.fail_attachment_writes.store(true, Ordering::SeqCst);
    let report = h
        .service
        .attach_target(key, Target::Vehicle(7), None)
        .await
        .unwrap()
        .automation
        .unwrap();

    let documents = report.step(StepKind::DocumentAttach).unwrap();
    assert_eq!(documents.status, StepStatus::Failed);
    assert_eq!(documents.detail, "copied 0 attachment(s), 1 failed");
    assert_eq!(report.attachments_copied, 0);
    for step in [
        StepKind::Notification,
        StepKind::RelatedState,
        StepKind::CategoryWorkflow,
    ] {
        assert_eq!(
            report.step(step).map(|s| s.status),
            Some(StepStatus::Completed),
            "{step}"
        );
    }

    let vehicle = flaky.get_target(Target::Vehicle(7)).await.unwrap().unwrap();
    assert!(vehicle.modified_at().is_some());
}

#[tokio::test]
async fn test_target_write_failure_still_runs_workflow() {
    let flaky = Arc::new(FlakyStorage::default());
    let h = harness_on(
        flaky.clone(),
        TargetRegistry::with_common_targets(),
        OutboxMailer::new(),
    )
    .await;
    flaky.fail_target_writes.store(true, Ordering::SeqCst);

    let mut order = PurchaseOrder::new("PO-17", 4, amount("180"))
        .with_description("Riparazione frizione")
        .with_target(Target::Vehicle(7));
    order.internal_notes = "Urgente".to_string();
    let report = h.service.save(order.into()).await.unwrap().automation.unwrap();

    assert_eq!(
        report.step(StepKind::MetadataSync).map(|s| s.status),
        Some(StepStatus::Failed)
    );
    assert_eq!(
        report.step(StepKind::RelatedState).map(|s| s.status),
        Some(StepStatus::Failed)
    );
    assert_eq!(
        report.step(StepKind::CategoryWorkflow).map(|s| s.status),
        Some(StepStatus::Completed)
    );
    assert_eq!(report.steps.len(), StepKind::ALL.len());
    assert!(report.maintenance_record_id.is_some());

    let vehicle = flaky.get_target(Target::Vehicle(7)).await.unwrap().unwrap();
    assert!(vehicle.notes().is_empty());
}

#[tokio::test]
async fn test_dry_run_and_summary() {
    let h = harness().await;
    let order = PurchaseOrder::new("PO-13", 4, amount("120")).with_description("Rifornimento diesel");
    let mut record = h.service.save(order.into()).await.unwrap().record;
    let key = record.key().unwrap();
    h.service
        .add_attachment(key, NewAttachment::new(key, "Bolla"))
        .await
        .unwrap();

    record.set_target(Some(Target::Vehicle(7)));
    let dry = h.service.engine().dry_run(&record).await;
    assert_eq!(dry.target.as_deref(), Some("Automezzo AB123CD"));
    assert!(dry.metadata_sync);
    assert_eq!(dry.documents_to_attach, 1);
    assert_eq!(dry.notifications_to_create, 1);
    assert_eq!(dry.categories, vec![Category::Fuel]);
    assert!(dry.errors.is_empty());
    assert!(h
        .storage
        .attachments_for(Target::Vehicle(7).into())
        .await
        .unwrap()
        .is_empty());

    let summary = h.service.engine().summary(&record).await;
    assert_eq!(summary.target_type.as_deref(), Some("Automezzo"));
    assert_eq!(summary.available_automations, StepKind::ALL.to_vec());
    assert_eq!(h.service.engine().runs(), 0);
}

#[tokio::test]
async fn test_delete_and_without_automation() {
    let h = harness().await;
    let bulk = h.service.without_automation();
    let order = PurchaseOrder::new("PO-14", 4, amount("1")).with_target(Target::Vehicle(7));
    let outcome = bulk.save(order.into()).await.unwrap();
    assert!(!outcome.automation_ran());
    assert_eq!(h.service.engine().runs(), 0);

    let key = outcome.record.key().unwrap();
    h.service.delete(key).await.unwrap();
    assert!(h.service.get(key).await.unwrap().is_none());

    let err = h.service.delete(key).await.unwrap_err();
    assert!(err.is_not_found());
    let err = h
        .service
        .attach_target(ProcurementKey::rfq(77), Target::Vehicle(7), None)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_rfq_email_carries_registration_documents() {
    let docs = tempfile::tempdir().unwrap();
    std::fs::write(docs.path().join("libretto_fronte.pdf"), b"%PDF-1.4 fronte").unwrap();

    let storage: DynStorage = Arc::new(InMemoryStorage::new());
    let mut vehicle = Vehicle::new(9, "CD456EF");
    vehicle.registration_front = Some("libretto_fronte.pdf".to_string());
    vehicle.registration_back = Some("libretto_retro.pdf".to_string());
    storage.save_target(TargetRecord::Vehicle(vehicle)).await.unwrap();
    storage
        .save_supplier(Supplier::new(4, "Officina Rossi").with_email("officina@rossi.it"))
        .await
        .unwrap();

    let outbox = Arc::new(OutboxMailer::new());
    let mailer: DynMailer = outbox.clone();
    let engine = AutomationEngine::new(
        Arc::new(TargetRegistry::with_common_targets()),
        storage.clone(),
        mailer,
    )
    .with_composer(RfqComposer::default().with_documents_root(docs.path()));
    let hooks = default_hooks(KeywordRules::default()).await;
    let service = ProcurementService::new(Arc::new(engine), Arc::new(hooks));

    let rfq = Rfq::new("RFQ-8", "Freni")
        .with_suppliers([4])
        .with_target(Target::Vehicle(9));
    let outcome = service.save(rfq.into()).await.unwrap();
    assert_eq!(outcome.automation.unwrap().emails_sent, 1);

    let messages = outbox.messages().await;
    assert_eq!(messages.len(), 1);
    // the missing back side is skipped
    assert_eq!(messages[0].attachments.len(), 1);
    assert_eq!(messages[0].attachments[0].filename, "libretto_fronte.pdf");
}
