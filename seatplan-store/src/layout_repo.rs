use async_trait::async_trait;
use seatplan_core::repository::{LayoutRepository, LayoutSnapshot, SaveReceipt};
use seatplan_core::{Device, LayoutResult, Person, Row, Seat};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::DbClient;
use crate::error::StoreError;

pub struct StoreLayoutRepository {
    db: DbClient,
}

impl StoreLayoutRepository {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }

    fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}

#[derive(sqlx::FromRow)]
struct RowRecord {
    row_uuid: String,
    row_name: String,
}

/// One seat joined with its row, occupant and device. Every joined column
/// is optional since the relations are outer-joined.
#[derive(sqlx::FromRow)]
struct SeatRecord {
    seat_uuid: String,
    row_uuid: Option<String>,
    seat_no: Option<String>,
    position_x: f64,
    position_y: f64,
    angle: f64,
    participant_id: Option<i64>,
    name: Option<String>,
    is_attending: Option<bool>,
    is_online: Option<bool>,
    status: Option<String>,
    device_uuid: Option<String>,
    type_uuid: Option<String>,
    specific_data: Option<String>,
}

impl SeatRecord {
    fn into_seat(self) -> Result<Seat, StoreError> {
        let mut seat = Seat::restore(parse_uuid(&self.seat_uuid)?, self.position_x, self.position_y);
        seat.angle = self.angle;
        seat.row_uuid = self.row_uuid.as_deref().map(parse_uuid).transpose()?;
        seat.number = self.seat_no.filter(|n| !n.is_empty());

        let device = match (self.device_uuid, self.type_uuid) {
            (Some(uuid), Some(type_uuid)) => Some(Device::restore(
                parse_uuid(&uuid)?,
                type_uuid,
                self.specific_data.unwrap_or_default(),
            )),
            _ => None,
        };
        seat.person = self.participant_id.map(|id| Person {
            participant_id: Some(id),
            name: self.name.unwrap_or_default(),
            device,
            is_attending: self.is_attending.unwrap_or(false),
            is_online: self.is_online.unwrap_or(false),
            status: self.status.unwrap_or_default().into(),
        });
        Ok(seat)
    }
}

fn parse_uuid(value: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(value).map_err(|e| StoreError::CorruptRecord(format!("bad uuid '{}': {}", value, e)))
}

impl StoreLayoutRepository {
    async fn load_project(&self, project_id: i64) -> Result<LayoutSnapshot, StoreError> {
        let rows = sqlx::query_as::<_, RowRecord>(
            "SELECT row_uuid, row_name FROM rows WHERE project_id = ? ORDER BY rowid",
        )
        .bind(project_id)
        .fetch_all(self.pool())
        .await?
        .into_iter()
        .map(|r| -> Result<Row, StoreError> { Ok(Row::restore(parse_uuid(&r.row_uuid)?, r.row_name)) })
        .collect::<Result<Vec<_>, StoreError>>()?;

        // Take the row id from the join so a link to a missing row reads as none.
        let seats = sqlx::query_as::<_, SeatRecord>(
            r#"
            SELECT s.seat_uuid, r.row_uuid, CAST(s.seat_no AS TEXT) AS seat_no,
                   s.position_x, s.position_y, s.angle,
                   p.participant_id, p.name, p.is_attending, p.is_online, p.status,
                   d.device_uuid, d.type_uuid, d.specific_data
            FROM seats s
            LEFT JOIN rows r ON r.row_uuid = s.row_uuid
            LEFT JOIN participants p ON p.participant_id = s.participant_id
            LEFT JOIN devices d ON d.device_uuid = s.device_record_uuid
            WHERE s.project_id = ?
            ORDER BY s.rowid
            "#,
        )
        .bind(project_id)
        .fetch_all(self.pool())
        .await?
        .into_iter()
        .map(SeatRecord::into_seat)
        .collect::<Result<Vec<_>, StoreError>>()?;

        Ok(LayoutSnapshot { rows, seats })
    }

    async fn save_project(&self, project_id: i64, rows: &[Row], seats: &[Seat]) -> Result<SaveReceipt, StoreError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM seats WHERE project_id = ?")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM participants WHERE project_id = ?")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM devices WHERE project_id = ?")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM rows WHERE project_id = ?")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        for row in rows {
            sqlx::query("INSERT INTO rows (row_uuid, project_id, row_name) VALUES (?, ?, ?)")
                .bind(row.uuid().to_string())
                .bind(project_id)
                .bind(&row.name)
                .execute(&mut *tx)
                .await?;
        }

        let mut receipt = SaveReceipt::default();
        for seat in seats {
            let mut participant_id = None;
            let mut device_uuid = None;

            if let Some(person) = &seat.person {
                if let Some(device) = &person.device {
                    insert_device(&mut tx, project_id, device).await?;
                    device_uuid = Some(device.device_uuid().to_string());
                }

                let id = insert_participant(&mut tx, project_id, person).await?;
                if person.participant_id.is_none() {
                    receipt.assigned_participants.push((seat.uuid(), id));
                }
                participant_id = Some(id);
            }

            sqlx::query(
                r#"
                INSERT INTO seats (seat_uuid, project_id, row_uuid, seat_no, participant_id,
                                   device_record_uuid, position_x, position_y, angle)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(seat.uuid().to_string())
            .bind(project_id)
            .bind(seat.row_uuid.map(|u| u.to_string()))
            .bind(seat.number.as_deref())
            .bind(participant_id)
            .bind(device_uuid)
            .bind(seat.position_x)
            .bind(seat.position_y)
            .bind(seat.angle)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(receipt)
    }
}

async fn insert_device(tx: &mut Transaction<'_, Sqlite>, project_id: i64, device: &Device) -> Result<(), StoreError> {
    sqlx::query("INSERT INTO devices (device_uuid, project_id, type_uuid, specific_data) VALUES (?, ?, ?, ?)")
        .bind(device.device_uuid().to_string())
        .bind(project_id)
        .bind(&device.type_uuid)
        .bind(&device.specific_data)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Write a participant, keeping its id when it has one. Returns the id.
async fn insert_participant(tx: &mut Transaction<'_, Sqlite>, project_id: i64, person: &Person) -> Result<i64, StoreError> {
    let status = person.status.to_string();
    match person.participant_id {
        Some(id) => {
            sqlx::query(
                r#"
                INSERT INTO participants (participant_id, project_id, name, is_attending, is_online, status)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(id)
            .bind(project_id)
            .bind(&person.name)
            .bind(person.is_attending)
            .bind(person.is_online)
            .bind(status)
            .execute(&mut **tx)
            .await?;
            Ok(id)
        }
        None => {
            let result = sqlx::query(
                r#"
                INSERT INTO participants (project_id, name, is_attending, is_online, status)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(project_id)
            .bind(&person.name)
            .bind(person.is_attending)
            .bind(person.is_online)
            .bind(status)
            .execute(&mut **tx)
            .await?;
            Ok(result.last_insert_rowid())
        }
    }
}

#[async_trait]
impl LayoutRepository for StoreLayoutRepository {
    async fn initialize(&self) -> LayoutResult<()> {
        self.db.migrate().await?;
        Ok(())
    }

    async fn load(&self, project_id: i64) -> LayoutResult<LayoutSnapshot> {
        let snapshot = self.load_project(project_id).await?;
        info!(
            "Loaded {} rows and {} seats for project {}",
            snapshot.rows.len(),
            snapshot.seats.len(),
            project_id
        );
        Ok(snapshot)
    }

    async fn save(&self, project_id: i64, rows: &[Row], seats: &[Seat]) -> LayoutResult<SaveReceipt> {
        let receipt = self.save_project(project_id, rows, seats).await?;
        debug!(
            "Saved project {}: {} rows, {} seats, {} new participants",
            project_id,
            rows.len(),
            seats.len(),
            receipt.assigned_participants.len()
        );
        Ok(receipt)
    }
}
