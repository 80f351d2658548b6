//! # Lifecycle Transitions
//!
//! One method per operation. Each loads the batch through the working set,
//! checks the transition table, applies the stage data and its financial
//! side-effects, then stages the record.

use super::{decode_batch, encode_batch, BatchLifecycleService, OperationContext};
use crate::domain::status;
use crate::domain::{
    settle, ApproveExportRequest, Batch, BatchStatus, ConfirmImportRequest,
    DispatchLocalTransportRequest, ExportDecision, ExportPermit, ExportShipment, Finance,
    ImportReceipt, LocalTransport, Operation, Origin, PaymentStatus, QualityControlRequest,
    QualityReport, ReceiveAtWarehouseRequest, RecordCheckpointRequest, RegisterHarvestRequest,
    ResidueResult, SettlementInput, SettlementOutcome, StartExportShipmentRequest,
    WarehouseArrival,
};
use crate::ports::inbound::BatchLifecycleApi;
use hc_01_keyed_store::{KeyPrefix, KeyValueStore, WorkingSet};
use hc_02_wallet_ledger::Wallet;
use shared_types::{percent_of, Clock, ContractError, EventSink, Money, Role, RoleResolver};

impl<S: KeyValueStore> OperationContext<'_, S> {
    fn load_batch(&self, batch_id: &str) -> Result<Batch, ContractError> {
        let not_found = || ContractError::BatchNotFound {
            batch_id: batch_id.to_string(),
        };
        if batch_id.is_empty() || KeyPrefix::is_wallet_key(batch_id.as_bytes()) {
            return Err(not_found());
        }
        let bytes = self.ws.get(batch_id.as_bytes())?.ok_or_else(not_found)?;
        decode_batch(batch_id.as_bytes(), &bytes)
    }

    fn stage_batch(&mut self, batch: &Batch) -> Result<(), ContractError> {
        let key = KeyPrefix::batch_key(&batch.batch_id)?;
        let bytes = encode_batch(batch)?;
        self.ws.put(key, bytes);
        Ok(())
    }

    /// Load the batch and check that `operation` may run on it.
    fn open(&self, operation: Operation, batch_id: &str) -> Result<Batch, ContractError> {
        let batch = self.load_batch(batch_id)?;
        status::guard(operation, &batch.batch_id, batch.status)?;
        Ok(batch)
    }

    /// Move the batch to `next`, re-checked against the table, and stage it.
    fn close(
        &mut self,
        operation: Operation,
        mut batch: Batch,
        next: BatchStatus,
    ) -> Result<Batch, ContractError> {
        batch.status = status::advance(operation, &batch.batch_id, batch.status, next)?;
        self.stage_batch(&batch)?;
        tracing::info!(
            batch_id = %batch.batch_id,
            operation = operation.name(),
            status = %batch.status,
            "[hc-03] Transition staged"
        );
        Ok(batch)
    }

    /// Transfer unless the amount is zero.
    fn pay(&mut self, from: Role, to: Role, amount: Money) -> Result<(), ContractError> {
        if amount.is_zero() {
            tracing::debug!(%from, %to, "[hc-03] Zero leg skipped");
            return Ok(());
        }
        self.ledger.transfer(&mut self.ws, from, to, amount)
    }

    /// The guarantor returns the down payment to the importer.
    fn refund_down_payment(
        &mut self,
        batch: &mut Batch,
        status: PaymentStatus,
    ) -> Result<(), ContractError> {
        let amount = batch.finance.down_payment;
        self.pay(Role::GUARANTOR, Role::Importer, amount)?;
        batch.finance.refund_down_payment(status);
        tracing::info!(batch_id = %batch.batch_id, %amount, %status, "[hc-03] Down payment refunded");
        Ok(())
    }

    fn register_harvest(&mut self, req: RegisterHarvestRequest) -> Result<Batch, ContractError> {
        let key = KeyPrefix::batch_key(&req.batch_id)?;
        if self.ws.exists(&key)? {
            return Err(ContractError::BatchAlreadyExists {
                batch_id: req.batch_id,
            });
        }
        req.validate()?;

        let down_payment = percent_of(req.contract_value, self.policy.down_payment_rate);
        self.pay(Role::Importer, Role::Producer, down_payment)?;

        let first = self.checkpoint(
            &req.location_name,
            &req.farm_geo,
            "Harvest & initial registration",
            "Producer",
        );
        let batch = Batch {
            batch_id: req.batch_id,
            status: BatchStatus::Harvested,
            origin: Origin {
                producer: req.producer,
                farm_geo: req.farm_geo,
                location_name: req.location_name,
                coffee_type: req.coffee_type,
                harvest_date: self.timestamp.clone(),
            },
            local_transport: None,
            warehouse: None,
            quality: None,
            export_permit: None,
            export_shipment: None,
            import: None,
            finance: Finance::opened(req.contract_value, down_payment),
            issue_notes: Vec::new(),
            journey: vec![first],
        };
        self.stage_batch(&batch)?;
        tracing::info!(
            batch_id = %batch.batch_id,
            contract_value = %batch.finance.contract_value,
            %down_payment,
            "[hc-03] Harvest registered"
        );
        Ok(batch)
    }

    fn dispatch_local_transport(
        &mut self,
        req: DispatchLocalTransportRequest,
    ) -> Result<Batch, ContractError> {
        let op = Operation::DispatchLocalTransport;
        req.validate()?;
        let mut batch = self.open(op, &req.batch_id)?;

        if req.temperature > self.policy.local_heat_limit {
            batch.finance.penalty_deductions += self.policy.local_heat_penalty;
            batch.issue_notes.push(format!(
                "PENALTY: local truck overheated ({:.1}°C)",
                req.temperature
            ));
        }
        let activity = format!("Loaded on truck {} ({:.1}°C)", req.plate_number, req.temperature);
        let point = self.checkpoint("Pick-up point (farm)", &req.current_geo, activity, "Local Logistics");
        batch.journey.push(point);
        batch.local_transport = Some(LocalTransport {
            driver: req.driver,
            plate_number: req.plate_number,
            truck_temperature: req.temperature,
        });

        self.close(op, batch, BatchStatus::EnRouteToWarehouse)
    }

    fn record_checkpoint(&mut self, req: RecordCheckpointRequest) -> Result<Batch, ContractError> {
        let op = Operation::RecordCheckpoint;
        let mut batch = self.open(op, &req.batch_id)?;

        let point = self.checkpoint(&req.location, &req.geo, req.activity, "Logistics/Transporter");
        batch.journey.push(point);

        let unchanged = batch.status;
        self.close(op, batch, unchanged)
    }

    fn receive_at_warehouse(
        &mut self,
        req: ReceiveAtWarehouseRequest,
    ) -> Result<Batch, ContractError> {
        let op = Operation::ReceiveAtWarehouse;
        let mut batch = self.open(op, &req.batch_id)?;

        batch.warehouse = Some(WarehouseArrival {
            location: format!("{}, {}", req.warehouse_name, req.city),
            arrival_date: self.timestamp.clone(),
        });
        let point = self.checkpoint(
            &req.warehouse_name,
            &req.geo,
            "Warehouse inbound (goods received)",
            "Cooperative",
        );
        batch.journey.push(point);

        self.close(op, batch, BatchStatus::ReceivedAtWarehouse)
    }

    fn process_quality_control(
        &mut self,
        req: QualityControlRequest,
    ) -> Result<Batch, ContractError> {
        let op = Operation::ProcessQualityControl;
        req.validate()?;
        let mut batch = self.open(op, &req.batch_id)?;

        let score = req.cupping_score;
        let contaminated = req.residue == ResidueResult::Contaminated;
        batch.quality = Some(QualityReport {
            method: req.method,
            cupping_score: score,
            residue: req.residue,
            net_weight: req.net_weight,
            processed_at: self.timestamp.clone(),
        });

        let next = if score < self.policy.qc_pass_score || contaminated {
            batch
                .issue_notes
                .push("EXPORT FAILED: poor cup quality or residue detected".to_string());
            self.refund_down_payment(&mut batch, PaymentStatus::RefundedQcFailed)?;
            BatchStatus::QcFailed
        } else {
            if score > self.policy.bonus_score {
                batch.finance.quality_bonus =
                    percent_of(batch.finance.contract_value, self.policy.quality_bonus_rate);
            }
            BatchStatus::ReadyForExport
        };

        self.close(op, batch, next)
    }

    fn approve_export(&mut self, req: ApproveExportRequest) -> Result<Batch, ContractError> {
        let op = Operation::ApproveExport;
        let mut batch = self.open(op, &req.batch_id)?;

        batch.export_permit = Some(ExportPermit {
            document_number: req.document_number,
            decision: req.decision,
            decided_at: self.timestamp.clone(),
        });

        let next = match req.decision {
            ExportDecision::Approved => BatchStatus::ExportApproved,
            ExportDecision::Rejected => {
                self.refund_down_payment(&mut batch, PaymentStatus::RefundedExportRejected)?;
                BatchStatus::ExportRejected
            }
        };

        self.close(op, batch, next)
    }

    fn start_export_shipment(
        &mut self,
        req: StartExportShipmentRequest,
    ) -> Result<Batch, ContractError> {
        let op = Operation::StartExportShipment;
        req.validate()?;
        let mut batch = self.open(op, &req.batch_id)?;

        if req.temperature > self.policy.export_heat_limit {
            let penalty = percent_of(
                batch.finance.contract_value,
                self.policy.export_heat_penalty_rate,
            );
            batch.finance.penalty_deductions += penalty;
            batch.issue_notes.push(format!(
                "PENALTY: container overheated ({:.1}°C)",
                req.temperature
            ));
        }
        let activity = format!("Loaded on export vessel {}", req.vessel);
        let point = self.checkpoint(
            "Port of origin (loading)",
            &req.origin_geo,
            activity,
            "Freight Forwarder",
        );
        batch.journey.push(point);
        batch.export_shipment = Some(ExportShipment {
            vessel: req.vessel,
            container: req.container,
            container_temperature: req.temperature,
            departure_date: self.timestamp.clone(),
        });

        self.close(op, batch, BatchStatus::InTransitExport)
    }

    fn confirm_import(&mut self, req: ConfirmImportRequest) -> Result<Batch, ContractError> {
        let op = Operation::ConfirmImport;
        req.validate()?;
        let mut batch = self.open(op, &req.batch_id)?;

        let warehouse_score =
            batch
                .warehouse_score()
                .ok_or_else(|| ContractError::MalformedRecord {
                    key: batch.batch_id.clone(),
                    reason: "batch in transit carries no quality report".to_string(),
                })?;
        let landed = req.landed_score;

        let input = SettlementInput {
            contract_value: batch.finance.contract_value,
            down_payment: batch.finance.down_payment,
            remaining_invoice: batch.finance.remaining_invoice,
            quality_bonus: batch.finance.quality_bonus,
            penalty_deductions: batch.finance.penalty_deductions,
            warehouse_score,
            landed_score: landed,
        };

        let next = match settle(self.policy, &input) {
            SettlementOutcome::Rejected { minimum_score, .. } => {
                batch.issue_notes.push(format!(
                    "REJECTED: landed score {landed} is below the minimum of {minimum_score}"
                ));
                self.refund_down_payment(&mut batch, PaymentStatus::RefundedImportRejected)?;
                BatchStatus::ImportRejected
            }
            SettlementOutcome::Accepted(paid) => {
                if paid.degradation_points > 0 {
                    batch.issue_notes.push(format!(
                        "Quality degraded by {} points (deduction {:.2}%)",
                        paid.degradation_points, paid.degradation_percent
                    ));
                }
                self.pay(Role::Importer, Role::Cooperative, paid.cooperative_share)?;
                self.pay(Role::Importer, Role::Producer, paid.producer_share)?;
                batch
                    .finance
                    .settle(paid.total_penalties, paid.final_transfer);
                tracing::info!(
                    batch_id = %batch.batch_id,
                    final_transfer = %paid.final_transfer,
                    cooperative = %paid.cooperative_share,
                    producer = %paid.producer_share,
                    "[hc-03] Batch settled"
                );
                BatchStatus::ImportAccepted
            }
        };

        let activity = format!("Landed quality verification (score {landed})");
        let point = self.checkpoint("Importer warehouse", &req.dest_geo, activity, &req.importer_name);
        batch.journey.push(point);
        batch.import = Some(ImportReceipt {
            importer_name: req.importer_name,
            received_date: self.timestamp.clone(),
            landed_score: landed,
        });

        self.close(op, batch, next)
    }
}

impl<S, C, E> BatchLifecycleApi for BatchLifecycleService<S, C, E>
where
    S: KeyValueStore,
    C: Clock,
    E: EventSink,
{
    fn initialize_wallets(&mut self) -> Result<Vec<Role>, ContractError> {
        self.run("InitializeWallets", |ctx| ctx.ledger.initialize(&mut ctx.ws))
    }

    fn get_balance(&self, role_id: &str) -> Result<Wallet, ContractError> {
        let ws = WorkingSet::new(&self.store);
        self.ledger.wallet_of(&ws, role_id)
    }

    fn register_harvest(
        &mut self,
        caller: &dyn RoleResolver,
        request: RegisterHarvestRequest,
    ) -> Result<Batch, ContractError> {
        self.transition(Operation::RegisterHarvest, caller, |ctx| {
            ctx.register_harvest(request)
        })
    }

    fn dispatch_local_transport(
        &mut self,
        caller: &dyn RoleResolver,
        request: DispatchLocalTransportRequest,
    ) -> Result<Batch, ContractError> {
        self.transition(Operation::DispatchLocalTransport, caller, |ctx| {
            ctx.dispatch_local_transport(request)
        })
    }

    fn record_checkpoint(
        &mut self,
        caller: &dyn RoleResolver,
        request: RecordCheckpointRequest,
    ) -> Result<Batch, ContractError> {
        self.transition(Operation::RecordCheckpoint, caller, |ctx| {
            ctx.record_checkpoint(request)
        })
    }

    fn receive_at_warehouse(
        &mut self,
        caller: &dyn RoleResolver,
        request: ReceiveAtWarehouseRequest,
    ) -> Result<Batch, ContractError> {
        self.transition(Operation::ReceiveAtWarehouse, caller, |ctx| {
            ctx.receive_at_warehouse(request)
        })
    }

    fn process_quality_control(
        &mut self,
        caller: &dyn RoleResolver,
        request: QualityControlRequest,
    ) -> Result<Batch, ContractError> {
        self.transition(Operation::ProcessQualityControl, caller, |ctx| {
            ctx.process_quality_control(request)
        })
    }

    fn approve_export(
        &mut self,
        caller: &dyn RoleResolver,
        request: ApproveExportRequest,
    ) -> Result<Batch, ContractError> {
        self.transition(Operation::ApproveExport, caller, |ctx| {
            ctx.approve_export(request)
        })
    }

    fn start_export_shipment(
        &mut self,
        caller: &dyn RoleResolver,
        request: StartExportShipmentRequest,
    ) -> Result<Batch, ContractError> {
        self.transition(Operation::StartExportShipment, caller, |ctx| {
            ctx.start_export_shipment(request)
        })
    }

    fn confirm_import(
        &mut self,
        caller: &dyn RoleResolver,
        request: ConfirmImportRequest,
    ) -> Result<Batch, ContractError> {
        self.transition(Operation::ConfirmImport, caller, |ctx| {
            ctx.confirm_import(request)
        })
    }
}
