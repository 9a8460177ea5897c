//! Implementation of the ProcurementStorage trait for InMemoryStorage.

use async_trait::async_trait;
use procurelink_core::model::{
    Attachment, MaintenanceRecord, NewAttachment, NewMaintenance, OwnerRef, ProcurementKey,
    ProcurementKind, ProcurementRecord, Supplier, SupplierQuoteRequest, TargetRecord,
};
use procurelink_core::{Target, TargetKind};
use procurelink_storage::{ProcurementStorage, StorageError, StorageStats};
use time::OffsetDateTime;

use crate::storage::InMemoryStorage;

#[async_trait]
impl ProcurementStorage for InMemoryStorage {
    async fn get_target(&self, target: Target) -> Result<Option<TargetRecord>, StorageError> {
        Ok(self.targets.pin().get(&target).cloned())
    }

    async fn list_targets(&self, kind: TargetKind) -> Result<Vec<TargetRecord>, StorageError> {
        let mut records: Vec<_> = self
            .targets
            .pin()
            .iter()
            .filter(|(target, _)| target.kind() == kind)
            .map(|(_, record)| record.clone())
            .collect();
        records.sort_by_key(|r| r.id());
        Ok(records)
    }

    async fn save_target(&self, record: TargetRecord) -> Result<TargetRecord, StorageError> {
        self.targets.pin().insert(record.target(), record.clone());
        Ok(record)
    }

    async fn get_procurement(
        &self,
        key: ProcurementKey,
    ) -> Result<Option<ProcurementRecord>, StorageError> {
        Ok(self.procurements.pin().get(&key).cloned())
    }

    async fn save_procurement(
        &self,
        mut record: ProcurementRecord,
    ) -> Result<ProcurementRecord, StorageError> {
        let kind = record.kind();
        match record.id() {
            Some(id) => self.observe_procurement_id(kind, id),
            None => record.set_id(self.next_procurement_id(kind)),
        }
        let key = record
            .key()
            .ok_or_else(|| StorageError::internal("record has no id after assignment"))?;
        self.procurements.pin().insert(key, record.clone());
        Ok(record)
    }

    async fn delete_procurement(&self, key: ProcurementKey) -> Result<(), StorageError> {
        match self.procurements.pin().remove(&key) {
            Some(_) => Ok(()),
            None => Err(StorageError::not_found(key.kind.as_str(), key.id)),
        }
    }

    async fn list_procurements(
        &self,
        kind: ProcurementKind,
    ) -> Result<Vec<ProcurementRecord>, StorageError> {
        let mut records: Vec<_> = self
            .procurements
            .pin()
            .iter()
            .filter(|(key, _)| key.kind == kind)
            .map(|(_, record)| record.clone())
            .collect();
        records.sort_by_key(|r| r.id());
        Ok(records)
    }

    async fn get_supplier(&self, id: u64) -> Result<Option<Supplier>, StorageError> {
        Ok(self.suppliers.pin().get(&id).cloned())
    }

    async fn save_supplier(&self, supplier: Supplier) -> Result<Supplier, StorageError> {
        self.suppliers.pin().insert(supplier.id, supplier.clone());
        Ok(supplier)
    }

    async fn upsert_quote_request(
        &self,
        request: SupplierQuoteRequest,
    ) -> Result<SupplierQuoteRequest, StorageError> {
        self.quote_requests
            .pin()
            .insert((request.rfq_id, request.supplier_id), request.clone());
        Ok(request)
    }

    async fn quote_requests(&self, rfq_id: u64) -> Result<Vec<SupplierQuoteRequest>, StorageError> {
        let mut requests: Vec<_> = self
            .quote_requests
            .pin()
            .iter()
            .filter(|((rfq, _), _)| *rfq == rfq_id)
            .map(|(_, request)| request.clone())
            .collect();
        requests.sort_by_key(|r| r.supplier_id);
        Ok(requests)
    }

    async fn attachments_for(&self, owner: OwnerRef) -> Result<Vec<Attachment>, StorageError> {
        let mut attachments: Vec<_> = self
            .attachments
            .pin()
            .iter()
            .filter(|(_, attachment)| attachment.owner == owner)
            .map(|(_, attachment)| attachment.clone())
            .collect();
        attachments.sort_by_key(|a| a.id);
        Ok(attachments)
    }

    async fn add_attachment(&self, attachment: NewAttachment) -> Result<Attachment, StorageError> {
        if attachment.title.trim().is_empty() {
            return Err(StorageError::invalid_record("attachment title is empty"));
        }
        let id = self.next_attachment_id();
        let stored = attachment.into_attachment(id, OffsetDateTime::now_utc());
        self.attachments.pin().insert(id, stored.clone());
        Ok(stored)
    }

    async fn create_maintenance(
        &self,
        maintenance: NewMaintenance,
    ) -> Result<MaintenanceRecord, StorageError> {
        let id = self.next_maintenance_id();
        let record = maintenance.into_record(id);
        self.maintenance.pin().insert(id, record.clone());
        Ok(record)
    }

    async fn get_maintenance(&self, id: u64) -> Result<Option<MaintenanceRecord>, StorageError> {
        Ok(self.maintenance.pin().get(&id).cloned())
    }

    async fn find_maintenance_by_source(
        &self,
        vehicle_id: u64,
        order_id: u64,
    ) -> Result<Option<MaintenanceRecord>, StorageError> {
        Ok(self
            .maintenance
            .pin()
            .iter()
            .map(|(_, record)| record)
            .filter(|r| r.vehicle_id == vehicle_id && r.source_order_id == Some(order_id))
            .min_by_key(|r| r.id)
            .cloned())
    }

    async fn maintenance_for_vehicle(
        &self,
        vehicle_id: u64,
    ) -> Result<Vec<MaintenanceRecord>, StorageError> {
        let mut records: Vec<_> = self
            .maintenance
            .pin()
            .iter()
            .filter(|(_, r)| r.vehicle_id == vehicle_id)
            .map(|(_, r)| r.clone())
            .collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    async fn stats(&self) -> Result<StorageStats, StorageError> {
        let targets = self.targets.pin();
        let procurements = self.procurements.pin();
        let count_targets = |kind| targets.iter().filter(|(t, _)| t.kind() == kind).count();
        let count_procurements =
            |kind| procurements.iter().filter(|(k, _)| k.kind == kind).count();

        Ok(StorageStats {
            vehicles: count_targets(TargetKind::Vehicle),
            plants: count_targets(TargetKind::Plant),
            suppliers: self.suppliers.len(),
            purchase_orders: count_procurements(ProcurementKind::PurchaseOrder),
            rfqs: count_procurements(ProcurementKind::Rfq),
            attachments: self.attachments.len(),
            maintenance_records: self.maintenance.len(),
        })
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use procurelink_core::model::{Plant, PurchaseOrder, Rfq, Vehicle};
    use time::macros::date;

    #[tokio::test]
    async fn test_target_roundtrip_and_listing() {
        let storage = InMemoryStorage::new();
        storage.save_target(Vehicle::new(7, "AB123CD").into()).await.unwrap();
        storage.save_target(Vehicle::new(2, "ZZ999ZZ").into()).await.unwrap();
        storage.save_target(Plant::new(7, "Nord").into()).await.unwrap();

        let vehicle = storage.get_target(Target::Vehicle(7)).await.unwrap().unwrap();
        assert_eq!(vehicle.label(), "AB123CD");
        assert!(storage.get_target(Target::Plant(2)).await.unwrap().is_none());

        let ids: Vec<_> = storage
            .list_targets(TargetKind::Vehicle)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id())
            .collect();
        assert_eq!(ids, vec![2, 7]);
    }

    #[tokio::test]
    async fn test_save_procurement_assigns_ids_per_kind() {
        let storage = InMemoryStorage::new();

        let order = storage
            .save_procurement(PurchaseOrder::new("PO-1", 1, BigDecimal::from(100)).into())
            .await
            .unwrap();
        let rfq = storage
            .save_procurement(Rfq::new("RFQ-1", "Gomme").into())
            .await
            .unwrap();
        let second = storage
            .save_procurement(PurchaseOrder::new("PO-2", 1, BigDecimal::from(5)).into())
            .await
            .unwrap();

        assert_eq!(order.id(), Some(1));
        assert_eq!(rfq.id(), Some(1));
        assert_eq!(second.id(), Some(2));
        assert_eq!(
            storage
                .list_procurements(ProcurementKind::PurchaseOrder)
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn test_explicit_ids_advance_sequence() {
        let storage = InMemoryStorage::new();
        let mut order = PurchaseOrder::new("PO-10", 1, BigDecimal::from(1));
        order.id = Some(10);
        storage.save_procurement(order.into()).await.unwrap();

        let next = storage
            .save_procurement(PurchaseOrder::new("PO-11", 1, BigDecimal::from(1)).into())
            .await
            .unwrap();
        assert_eq!(next.id(), Some(11));
    }

    #[tokio::test]
    async fn test_delete_procurement() {
        let storage = InMemoryStorage::new();
        let rfq = storage
            .save_procurement(Rfq::new("RFQ-1", "Toner").into())
            .await
            .unwrap();
        let key = rfq.key().unwrap();

        storage.delete_procurement(key).await.unwrap();
        assert!(storage.get_procurement(key).await.unwrap().is_none());

        let err = storage.delete_procurement(key).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_attachments_by_owner() {
        let storage = InMemoryStorage::new();
        let owner = OwnerRef::from(ProcurementKey::purchase_order(1));
        storage
            .add_attachment(NewAttachment::new(owner, "Offerta").with_file("a.pdf"))
            .await
            .unwrap();
        storage
            .add_attachment(NewAttachment::new(Target::Vehicle(7), "Libretto"))
            .await
            .unwrap();
        storage
            .add_attachment(NewAttachment::new(owner, "Capitolato"))
            .await
            .unwrap();

        let titles: Vec<_> = storage
            .attachments_for(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["Offerta", "Capitolato"]);

        let err = storage
            .add_attachment(NewAttachment::new(owner, "  "))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidRecord { .. }));
    }

    #[tokio::test]
    async fn test_quote_requests_upsert() {
        let storage = InMemoryStorage::new();
        let request = SupplierQuoteRequest {
            rfq_id: 1,
            supplier_id: 4,
            email_sent: false,
            sent_at: None,
        };
        storage.upsert_quote_request(request.clone()).await.unwrap();
        storage
            .upsert_quote_request(SupplierQuoteRequest {
                email_sent: true,
                ..request
            })
            .await
            .unwrap();

        let requests = storage.quote_requests(1).await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].email_sent);
        assert!(storage.quote_requests(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_maintenance_lookup_by_source() {
        let storage = InMemoryStorage::new();
        let created = storage
            .create_maintenance(NewMaintenance {
                vehicle_id: 7,
                description: "Manutenzione da ordine PO-1".into(),
                scheduled_date: date!(2024 - 05 - 10),
                cost: BigDecimal::from(250),
                internal_notes: String::new(),
                assigned_to: None,
                source_order_id: Some(1),
            })
            .await
            .unwrap();

        let found = storage.find_maintenance_by_source(7, 1).await.unwrap();
        assert_eq!(found.map(|m| m.id), Some(created.id));
        assert!(storage.find_maintenance_by_source(7, 2).await.unwrap().is_none());
        assert_eq!(storage.maintenance_for_vehicle(7).await.unwrap().len(), 1);
        assert!(storage.get_maintenance(created.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_stats() {
        let storage = InMemoryStorage::new();
        storage.save_target(Vehicle::new(1, "AA111AA").into()).await.unwrap();
        storage.save_target(Plant::new(1, "Sud").into()).await.unwrap();
        storage.save_supplier(Supplier::new(1, "Acme")).await.unwrap();
        storage
            .save_procurement(Rfq::new("RFQ-1", "Carta").into())
            .await
            .unwrap();

        let stats = storage.stats().await.unwrap();
        assert_eq!(stats.vehicles, 1);
        assert_eq!(stats.plants, 1);
        assert_eq!(stats.suppliers, 1);
        assert_eq!(stats.rfqs, 1);
        assert_eq!(stats.purchase_orders, 0);
        assert_eq!(storage.count(), 4);
        assert_eq!(storage.backend_name(), "memory");
    }
}
