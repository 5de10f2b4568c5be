//! Database repository for CRUD operations.
//!
//! Uses prepared statements and transactions for data integrity. Calendar
//! regeneration replaces a whole year atomically; every other write is
//! row-level.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Row, SqlitePool};

use crate::dates;
use crate::engine::TurnDraft;
use crate::errors::AppError;
use crate::models::{
    join_payment_detail, parse_payment_detail, Datastore, Participant, ParticipantDraft,
    ParticipantUpdate, PayoutTurn, RevisionInfo, TurnStatus, UpdateTurnRequest,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    /// Increment the revision ID and return the new value.
    pub async fn increment_revision(&self) -> Result<i64, AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        self.get_revision_id().await
    }

    /// Get the full datastore snapshot.
    pub async fn get_datastore(&self) -> Result<Datastore, AppError> {
        let meta =
            sqlx::query("SELECT schema_version, revision_id, generated_at FROM meta WHERE id = 1")
                .fetch_one(&self.pool)
                .await?;

        let participants = self.list_participants().await?;
        let calendar = self.list_calendar().await?;

        Ok(Datastore {
            schema_version: meta.get("schema_version"),
            revision_id: meta.get("revision_id"),
            generated_at: meta.get("generated_at"),
            participants,
            calendar,
        })
    }

    // ==================== PARTICIPANT OPERATIONS ====================

    /// List all participants in registration order (ids grow monotonically).
    pub async fn list_participants(&self) -> Result<Vec<Participant>, AppError> {
        let rows = sqlx::query(
            "SELECT id, nombre, fecha_cumple, telefono, email, notas FROM participantes ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(participant_from_row).collect())
    }

    /// Get a participant by ID.
    pub async fn get_participant(&self, id: i64) -> Result<Option<Participant>, AppError> {
        let row = sqlx::query(
            "SELECT id, nombre, fecha_cumple, telefono, email, notas FROM participantes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(participant_from_row))
    }

    /// Register a new participant; ids continue from the table maximum.
    pub async fn create_participant(
        &self,
        draft: &ParticipantDraft,
    ) -> Result<Participant, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT COALESCE(MAX(id), 0) + 1 AS next_id FROM participantes")
            .fetch_one(&mut *tx)
            .await?;
        let id: i64 = row.get("next_id");

        sqlx::query(
            "INSERT INTO participantes (id, nombre, fecha_cumple, telefono, email, notas) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(draft.birthdate)
        .bind(&draft.phone)
        .bind(&draft.email)
        .bind(&draft.notes)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        self.increment_revision().await?;

        Ok(Participant {
            id,
            name: draft.name.clone(),
            birthdate: draft.birthdate,
            phone: draft.phone.clone(),
            email: draft.email.clone(),
            notes: draft.notes.clone(),
        })
    }

    /// Update a participant in place; omitted fields keep current values.
    pub async fn update_participant(
        &self,
        id: i64,
        update: &ParticipantUpdate,
    ) -> Result<Participant, AppError> {
        let existing = self
            .get_participant(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Participant {} not found", id)))?;

        let name = update.name.clone().unwrap_or(existing.name);
        let birthdate = match update.birthdate {
            Some(value) => value,
            None => existing.birthdate,
        };
        let phone = update.phone.clone().or(existing.phone);
        let email = update.email.clone().or(existing.email);
        let notes = update.notes.clone().or(existing.notes);

        sqlx::query(
            "UPDATE participantes SET nombre = ?, fecha_cumple = ?, telefono = ?, email = ?, notas = ? WHERE id = ?",
        )
        .bind(&name)
        .bind(birthdate)
        .bind(&phone)
        .bind(&email)
        .bind(&notes)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(Participant {
            id,
            name,
            birthdate,
            phone,
            email,
            notes,
        })
    }

    /// Delete a participant. Historical calendar turns are left untouched.
    pub async fn delete_participant(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM participantes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Participant {} not found", id)));
        }

        self.increment_revision().await?;
        Ok(())
    }

    // ==================== CALENDAR OPERATIONS ====================

    /// List the whole calendar, every year, in payout order.
    pub async fn list_calendar(&self) -> Result<Vec<PayoutTurn>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, anio, id_participante, nombre_participante, fecha_pago,
                      monto_por_persona, total_a_recibir, estatus, fecha_pago_real,
                      notas, pagos_detalle
               FROM calendario ORDER BY anio, fecha_pago, id"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(turn_from_row).collect())
    }

    /// List one year's turns sorted by pay date.
    pub async fn list_turns_for_year(&self, year: i32) -> Result<Vec<PayoutTurn>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, anio, id_participante, nombre_participante, fecha_pago,
                      monto_por_persona, total_a_recibir, estatus, fecha_pago_real,
                      notas, pagos_detalle
               FROM calendario WHERE anio = ? ORDER BY fecha_pago, id"#,
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(turn_from_row).collect())
    }

    /// Years that have a generated calendar, ascending.
    pub async fn list_years(&self) -> Result<Vec<i32>, AppError> {
        let rows = sqlx::query("SELECT DISTINCT anio FROM calendario ORDER BY anio")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|row| row.get("anio")).collect())
    }

    /// Get a turn by ID.
    pub async fn get_turn(&self, id: i64) -> Result<Option<PayoutTurn>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, anio, id_participante, nombre_participante, fecha_pago,
                      monto_por_persona, total_a_recibir, estatus, fecha_pago_real,
                      notas, pagos_detalle
               FROM calendario WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(turn_from_row))
    }

    /// Replace a year's calendar: delete its turns, then insert the new ones
    /// with fresh ids continuing the collection maximum. Other years are
    /// untouched.
    pub async fn replace_year(
        &self,
        year: i32,
        contribution: Decimal,
        total_payout: Decimal,
        drafts: &[TurnDraft],
    ) -> Result<Vec<PayoutTurn>, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM calendario WHERE anio = ?")
            .bind(year)
            .execute(&mut *tx)
            .await?;

        // Max over the remaining rows, matching the original id sequence
        let row = sqlx::query("SELECT COALESCE(MAX(id), 0) AS max_id FROM calendario")
            .fetch_one(&mut *tx)
            .await?;
        let mut next_id: i64 = row.get("max_id");

        let mut turns = Vec::with_capacity(drafts.len());
        for draft in drafts {
            next_id += 1;
            sqlx::query(
                r#"INSERT INTO calendario (
                    id, anio, id_participante, nombre_participante, fecha_pago,
                    monto_por_persona, total_a_recibir, estatus, fecha_pago_real,
                    notas, pagos_detalle
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, NULL, NULL, '')"#,
            )
            .bind(next_id)
            .bind(year)
            .bind(draft.participant_id)
            .bind(&draft.participant_name)
            .bind(draft.pay_date)
            .bind(contribution.to_string())
            .bind(total_payout.to_string())
            .bind(TurnStatus::Pending.as_str())
            .execute(&mut *tx)
            .await?;

            turns.push(PayoutTurn {
                id: next_id,
                year,
                participant_id: draft.participant_id,
                participant_name: draft.participant_name.clone(),
                pay_date: draft.pay_date,
                contribution_per_person: contribution,
                total_payout,
                status: TurnStatus::Pending,
                actual_pay_date: None,
                payment_detail: Vec::new(),
                notes: None,
            });
        }

        tx.commit().await?;
        self.increment_revision().await?;

        Ok(turns)
    }

    /// Edit a turn's status, actual pay date and notes.
    ///
    /// When the status moves to Completed without a recorded or provided
    /// actual pay date, today's date is stored; a later move back to
    /// Pending does not clear it.
    pub async fn update_turn(
        &self,
        id: i64,
        request: &UpdateTurnRequest,
    ) -> Result<PayoutTurn, AppError> {
        let existing = self
            .get_turn(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Turn {} not found", id)))?;

        let status = request.status.unwrap_or(existing.status);
        let notes = request.notes.clone().or_else(|| existing.notes.clone());
        let actual_pay_date = match request.actual_pay_date {
            Some(date) => Some(date),
            None if status == TurnStatus::Completed && existing.actual_pay_date.is_none() => {
                Some(Utc::now().date_naive())
            }
            None => existing.actual_pay_date,
        };

        sqlx::query(
            "UPDATE calendario SET estatus = ?, fecha_pago_real = ?, notas = ? WHERE id = ?",
        )
        .bind(status.as_str())
        .bind(actual_pay_date)
        .bind(&notes)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(PayoutTurn {
            status,
            actual_pay_date,
            notes,
            ..existing
        })
    }

    /// Add or remove one member's confirmed contribution on a turn. Once
    /// the confirmed count reaches `threshold` the turn is forced to
    /// Completed.
    pub async fn record_member_payment(
        &self,
        turn_id: i64,
        participant_id: i64,
        paid: bool,
        threshold: usize,
    ) -> Result<PayoutTurn, AppError> {
        let existing = self
            .get_turn(turn_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Turn {} not found", turn_id)))?;

        let mut payment_detail = existing.payment_detail.clone();
        if paid {
            if !payment_detail.contains(&participant_id) {
                payment_detail.push(participant_id);
            }
        } else {
            payment_detail.retain(|&id| id != participant_id);
        }

        let mut status = existing.status;
        let mut actual_pay_date = existing.actual_pay_date;
        if threshold > 0 && payment_detail.len() >= threshold && status != TurnStatus::Completed {
            status = TurnStatus::Completed;
            if actual_pay_date.is_none() {
                actual_pay_date = Some(Utc::now().date_naive());
            }
        }

        sqlx::query(
            "UPDATE calendario SET pagos_detalle = ?, estatus = ?, fecha_pago_real = ? WHERE id = ?",
        )
        .bind(join_payment_detail(&payment_detail))
        .bind(status.as_str())
        .bind(actual_pay_date)
        .bind(turn_id)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(PayoutTurn {
            status,
            actual_pay_date,
            payment_detail,
            ..existing
        })
    }
}

// Helper functions for row conversion

fn participant_from_row(row: &sqlx::sqlite::SqliteRow) -> Participant {
    // Rows hand-edited into the store may hold any date text; unparseable
    // values read as "no birthdate" so the row still loads
    let birthdate_str: Option<String> = row.get("fecha_cumple");
    Participant {
        id: row.get("id"),
        name: row.get("nombre"),
        birthdate: birthdate_str.as_deref().and_then(dates::parse_flexible),
        phone: row.get("telefono"),
        email: row.get("email"),
        notes: row.get("notas"),
    }
}

fn turn_from_row(row: &sqlx::sqlite::SqliteRow) -> PayoutTurn {
    let status_str: String = row.get("estatus");
    let contribution_str: String = row.get("monto_por_persona");
    let total_str: String = row.get("total_a_recibir");
    let detail_str: String = row.get("pagos_detalle");
    let pay_date: NaiveDate = row.get("fecha_pago");
    let actual_pay_date: Option<NaiveDate> = row.get("fecha_pago_real");

    PayoutTurn {
        id: row.get("id"),
        year: row.get("anio"),
        participant_id: row.get("id_participante"),
        participant_name: row.get("nombre_participante"),
        pay_date,
        contribution_per_person: contribution_str.parse().unwrap_or_default(),
        total_payout: total_str.parse().unwrap_or_default(),
        status: TurnStatus::from_str(&status_str).unwrap_or(TurnStatus::Pending),
        actual_pay_date,
        payment_detail: parse_payment_detail(&detail_str),
        notes: row.get("notas"),
    }
}
