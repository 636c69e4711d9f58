//! Postgres-backed implementation of the hotel store.
//!
//! # What this module is
//! Implements [`HotelStore`] using Postgres (via `sqlx`) as the durable
//! backing store for every resource: hotels, staff, guests, room types,
//! rooms, bookings, payments, and the admin records.
//!
//! # Soft delete
//! Soft-deletable tables carry `(is_deleted, deleted_at)`; the live, deleted,
//! and all views are `WHERE` filters over those columns. Cascade walks run
//! inside a single transaction: the worklist follows the static ownership
//! edges on [`RecordKind`], so a partially applied cascade is never visible
//! to other connections.
//!
//! # Consistency / atomicity
//! Booking creation locks the room row (`FOR UPDATE`) before checking
//! availability, and payment creation locks the booking row before summing
//! the ledger, so concurrent requests cannot double-book a room or overpay a
//! booking.
//!
//! # Operational notes
//! - Migrations run at startup via `sqlx::migrate!("./migrations")`; if they
//!   fail, startup fails rather than serving against a partial schema.
//! - Connection pooling and acquire timeouts are explicit because hanging
//!   forever on DB failures is unacceptable for a serving path.
//! - Dynamic SQL is limited to table names from a fixed allowlist defined in
//!   code ([`table_for`]); never pass user input into those format strings.
//! - Database URLs may contain credentials; avoid logging them.
use super::{HotelStore, StoreError, StoreResult};
use crate::config::PostgresConfig;
use crate::model::{
    Booking, BookingBalance, BookingUpdate, Group, Guest, Hotel, HotelSummary, NewBooking,
    NewGroup, NewGuest, NewHotel, NewPayment, NewPermission, NewRoom, NewRoomType, NewStaff,
    NewUser, Payment, PaymentMethod, Permission, RecordKind, RecordView, Room, RoomStatus,
    RoomType, Staff, User,
};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{FromRow, PgConnection, PgPool};
use std::str::FromStr;
use std::time::Duration;

/// Durable hotel store backed by Postgres.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect, run migrations, and return a ready store.
    pub async fn connect(pg: &PostgresConfig) -> StoreResult<Self> {
        // Pool tuning: `max_connections` caps concurrent DB work;
        // `acquire_timeout` bounds how long a request waits for a pooled
        // connection before failing fast.
        let connect_options = PgConnectOptions::from_str(&pg.url)
            .map_err(|err| StoreError::Unexpected(err.into()))?;
        let pool = PgPoolOptions::new()
            .max_connections(pg.max_connections)
            .acquire_timeout(Duration::from_millis(pg.acquire_timeout_ms))
            .connect_with(connect_options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }
}

// DB-facing row structs are kept separate from the domain types so schema
// details (column names, string enums) stay localized here.

#[derive(Debug, Clone, FromRow)]
struct DbHotel {
    id: i64,
    name: String,
    address: String,
    village: String,
    district: String,
    province: String,
    phone: String,
    email: String,
    stars: i16,
    check_in_time: NaiveTime,
    check_out_time: NaiveTime,
    is_deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<DbHotel> for Hotel {
    fn from(row: DbHotel) -> Self {
        Hotel {
            id: row.id,
            name: row.name,
            address: row.address,
            village: row.village,
            district: row.district,
            province: row.province,
            phone: row.phone,
            email: row.email,
            stars: row.stars,
            check_in_time: row.check_in_time,
            check_out_time: row.check_out_time,
            is_deleted: row.is_deleted,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct DbStaff {
    id: i64,
    hotel_id: i64,
    first_name: String,
    last_name: String,
    position: String,
    salary: Decimal,
    date_of_birth: NaiveDate,
    phone: String,
    email: String,
    hire_date: NaiveDate,
    is_deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<DbStaff> for Staff {
    fn from(row: DbStaff) -> Self {
        Staff {
            id: row.id,
            hotel_id: row.hotel_id,
            first_name: row.first_name,
            last_name: row.last_name,
            position: row.position,
            salary: row.salary,
            date_of_birth: row.date_of_birth,
            phone: row.phone,
            email: row.email,
            hire_date: row.hire_date,
            is_deleted: row.is_deleted,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct DbGuest {
    id: i64,
    first_name: String,
    last_name: String,
    date_of_birth: NaiveDate,
    address: String,
    phone: String,
    email: String,
    is_deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<DbGuest> for Guest {
    fn from(row: DbGuest) -> Self {
        Guest {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            date_of_birth: row.date_of_birth,
            address: row.address,
            phone: row.phone,
            email: row.email,
            is_deleted: row.is_deleted,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct DbRoomType {
    id: i64,
    name: String,
    description: String,
    price_per_night: Decimal,
    capacity: i32,
    is_deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<DbRoomType> for RoomType {
    fn from(row: DbRoomType) -> Self {
        RoomType {
            id: row.id,
            name: row.name,
            description: row.description,
            price_per_night: row.price_per_night,
            capacity: row.capacity,
            is_deleted: row.is_deleted,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct DbRoom {
    id: i64,
    hotel_id: i64,
    room_type_id: i64,
    room_number: String,
    status: String,
    is_deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<DbRoom> for Room {
    type Error = StoreError;

    fn try_from(row: DbRoom) -> StoreResult<Self> {
        let status = RoomStatus::parse(&row.status)
            .ok_or_else(|| anyhow!("unknown room status {:?} for room {}", row.status, row.id))?;
        Ok(Room {
            id: row.id,
            hotel_id: row.hotel_id,
            room_type_id: row.room_type_id,
            room_number: row.room_number,
            status,
            is_deleted: row.is_deleted,
            deleted_at: row.deleted_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
struct DbBooking {
    id: i64,
    guest_id: i64,
    room_id: i64,
    check_in_date: NaiveDate,
    check_out_date: NaiveDate,
    total_price: Decimal,
    is_deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<DbBooking> for Booking {
    fn from(row: DbBooking) -> Self {
        Booking {
            id: row.id,
            guest_id: row.guest_id,
            room_id: row.room_id,
            check_in_date: row.check_in_date,
            check_out_date: row.check_out_date,
            number_of_days: (row.check_out_date - row.check_in_date).num_days(),
            total_price: row.total_price,
            is_deleted: row.is_deleted,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct DbPayment {
    id: i64,
    booking_id: i64,
    amount: Decimal,
    payment_date: NaiveDate,
    method: String,
    is_deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<DbPayment> for Payment {
    type Error = StoreError;

    fn try_from(row: DbPayment) -> StoreResult<Self> {
        let method = PaymentMethod::parse(&row.method).ok_or_else(|| {
            anyhow!("unknown payment method {:?} for payment {}", row.method, row.id)
        })?;
        Ok(Payment {
            id: row.id,
            booking_id: row.booking_id,
            amount: row.amount,
            payment_date: row.payment_date,
            method,
            is_deleted: row.is_deleted,
            deleted_at: row.deleted_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
struct DbUser {
    id: i64,
    username: String,
    lastname: String,
    email: String,
    is_active: bool,
    is_staff: bool,
    date_joined: DateTime<Utc>,
    is_deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
}

impl DbUser {
    fn into_user(self, group_ids: Vec<i64>) -> User {
        User {
            id: self.id,
            username: self.username,
            lastname: self.lastname,
            email: self.email,
            is_active: self.is_active,
            is_staff: self.is_staff,
            date_joined: self.date_joined,
            group_ids,
            is_deleted: self.is_deleted,
            deleted_at: self.deleted_at,
        }
    }
}

/// Fixed table-name allowlist for the generic soft-delete surface. Dynamic
/// SQL below only ever interpolates these values.
fn table_for(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Hotel => "hotels",
        RecordKind::Staff => "staff",
        RecordKind::Guest => "guests",
        RecordKind::RoomType => "room_types",
        RecordKind::Room => "rooms",
        RecordKind::Booking => "bookings",
        RecordKind::Payment => "payments",
        RecordKind::User => "users",
    }
}

fn view_filter(view: RecordView) -> &'static str {
    match view {
        RecordView::Live => " WHERE NOT is_deleted",
        RecordView::Deleted => " WHERE is_deleted",
        RecordView::All => "",
    }
}

async fn record_exists(
    conn: &mut PgConnection,
    kind: RecordKind,
    id: i64,
) -> Result<bool, sqlx::Error> {
    let query = format!("SELECT 1 FROM {} WHERE id = $1", table_for(kind));
    let found: Option<i32> = sqlx::query_scalar(&query).bind(id).fetch_optional(conn).await?;
    Ok(found.is_some())
}

/// Direct dependents of a record along the static ownership edges,
/// regardless of their own deletion state.
async fn child_records(
    conn: &mut PgConnection,
    kind: RecordKind,
    id: i64,
) -> Result<Vec<(RecordKind, i64)>, sqlx::Error> {
    let edges: &[(&str, RecordKind)] = match kind {
        RecordKind::Hotel => &[
            ("SELECT id FROM staff WHERE hotel_id = $1", RecordKind::Staff),
            ("SELECT id FROM rooms WHERE hotel_id = $1", RecordKind::Room),
        ],
        RecordKind::RoomType => &[(
            "SELECT id FROM rooms WHERE room_type_id = $1",
            RecordKind::Room,
        )],
        RecordKind::Guest => &[(
            "SELECT id FROM bookings WHERE guest_id = $1",
            RecordKind::Booking,
        )],
        RecordKind::Room => &[(
            "SELECT id FROM bookings WHERE room_id = $1",
            RecordKind::Booking,
        )],
        RecordKind::Booking => &[(
            "SELECT id FROM payments WHERE booking_id = $1",
            RecordKind::Payment,
        )],
        RecordKind::Staff | RecordKind::Payment | RecordKind::User => &[],
    };
    let mut children = Vec::new();
    for (query, child_kind) in edges {
        let ids: Vec<(i64,)> = sqlx::query_as(query).bind(id).fetch_all(&mut *conn).await?;
        children.extend(ids.into_iter().map(|(child_id,)| (*child_kind, child_id)));
    }
    Ok(children)
}

/// Whether a booking exists and is not soft-deleted. Only a live booking
/// holds its room occupied, so only live bookings release rooms on delete.
async fn booking_is_live(conn: &mut PgConnection, booking_id: i64) -> Result<bool, sqlx::Error> {
    let live: Option<bool> =
        sqlx::query_scalar("SELECT NOT is_deleted FROM bookings WHERE id = $1")
            .bind(booking_id)
            .fetch_optional(conn)
            .await?;
    Ok(live.unwrap_or(false))
}

/// Booking post-delete hook: flip the booked room back to available.
async fn release_room(conn: &mut PgConnection, booking_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE rooms SET status = 'available' \
         WHERE id = (SELECT room_id FROM bookings WHERE id = $1)",
    )
    .bind(booking_id)
    .execute(conn)
    .await?;
    Ok(())
}

/// Booking post-restore hook: re-occupy the room when it is free; leave it
/// alone (and log) when something else took it in the meantime.
async fn reoccupy_room(conn: &mut PgConnection, booking_id: i64) -> Result<(), sqlx::Error> {
    let status: Option<String> = sqlx::query_scalar(
        "SELECT r.status FROM rooms r JOIN bookings b ON b.room_id = r.id WHERE b.id = $1",
    )
    .bind(booking_id)
    .fetch_optional(&mut *conn)
    .await?;
    match status.as_deref() {
        Some("available") => {
            sqlx::query(
                "UPDATE rooms SET status = 'occupied' \
                 WHERE id = (SELECT room_id FROM bookings WHERE id = $1)",
            )
            .bind(booking_id)
            .execute(conn)
            .await?;
        }
        Some(_) => {
            tracing::warn!(booking_id, "restored booking into an occupied room");
        }
        None => {}
    }
    Ok(())
}

async fn ensure_live_hotel(conn: &mut PgConnection, hotel_id: i64) -> StoreResult<()> {
    let found: Option<i32> =
        sqlx::query_scalar("SELECT 1 FROM hotels WHERE id = $1 AND NOT is_deleted")
            .bind(hotel_id)
            .fetch_optional(conn)
            .await?;
    if found.is_none() {
        return Err(StoreError::Validation(format!(
            "hotel {hotel_id} does not exist"
        )));
    }
    Ok(())
}

async fn ensure_live_room_type(conn: &mut PgConnection, room_type_id: i64) -> StoreResult<()> {
    let found: Option<i32> =
        sqlx::query_scalar("SELECT 1 FROM room_types WHERE id = $1 AND NOT is_deleted")
            .bind(room_type_id)
            .fetch_optional(conn)
            .await?;
    if found.is_none() {
        return Err(StoreError::Validation(format!(
            "room type {room_type_id} does not exist"
        )));
    }
    Ok(())
}

async fn group_ids_for_user(conn: &mut PgConnection, user_id: i64) -> Result<Vec<i64>, sqlx::Error> {
    let rows: Vec<(i64,)> = sqlx::query_as(
        "SELECT group_id FROM user_group_memberships WHERE user_id = $1 ORDER BY group_id",
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

async fn permission_ids_for_group(
    conn: &mut PgConnection,
    group_id: i64,
) -> Result<Vec<i64>, sqlx::Error> {
    let rows: Vec<(i64,)> = sqlx::query_as(
        "SELECT permission_id FROM group_permission_grants WHERE group_id = $1 ORDER BY permission_id",
    )
    .bind(group_id)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

async fn ensure_groups_exist(conn: &mut PgConnection, group_ids: &[i64]) -> StoreResult<()> {
    for id in group_ids {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM auth_groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        if found.is_none() {
            return Err(StoreError::Validation(format!("group {id} does not exist")));
        }
    }
    Ok(())
}

async fn ensure_permissions_exist(
    conn: &mut PgConnection,
    permission_ids: &[i64],
) -> StoreResult<()> {
    for id in permission_ids {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM auth_permissions WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        if found.is_none() {
            return Err(StoreError::Validation(format!(
                "permission {id} does not exist"
            )));
        }
    }
    Ok(())
}

fn validate_stars(stars: i16) -> StoreResult<()> {
    if !(1..=5).contains(&stars) {
        return Err(StoreError::Validation(
            "stars must be between 1 and 5".into(),
        ));
    }
    Ok(())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().map(|code| code == "23505").unwrap_or(false);
    }
    false
}

const HOTEL_COLUMNS: &str = "id, name, address, village, district, province, phone, email, stars, \
     check_in_time, check_out_time, is_deleted, deleted_at";
const STAFF_COLUMNS: &str = "id, hotel_id, first_name, last_name, position, salary, date_of_birth, \
     phone, email, hire_date, is_deleted, deleted_at";
const GUEST_COLUMNS: &str =
    "id, first_name, last_name, date_of_birth, address, phone, email, is_deleted, deleted_at";
const ROOM_TYPE_COLUMNS: &str =
    "id, name, description, price_per_night, capacity, is_deleted, deleted_at";
const ROOM_COLUMNS: &str =
    "id, hotel_id, room_type_id, room_number, status, is_deleted, deleted_at";
const BOOKING_COLUMNS: &str = "id, guest_id, room_id, check_in_date, check_out_date, total_price, \
     is_deleted, deleted_at";
const PAYMENT_COLUMNS: &str =
    "id, booking_id, amount, payment_date, method, is_deleted, deleted_at";
const USER_COLUMNS: &str = "id, username, lastname, email, is_active, is_staff, date_joined, \
     is_deleted, deleted_at";

#[async_trait]
impl HotelStore for PostgresStore {
    async fn soft_delete(&self, kind: RecordKind, id: i64, cascade: bool) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        if !record_exists(&mut tx, kind, id).await? {
            return Err(StoreError::NotFound(kind.as_str().into()));
        }
        let now = Utc::now();
        let mut stack = vec![(kind, id)];
        while let Some((k, i)) = stack.pop() {
            let was_live_booking = k == RecordKind::Booking && booking_is_live(&mut tx, i).await?;
            let query = format!(
                "UPDATE {} SET is_deleted = TRUE, deleted_at = $2 WHERE id = $1",
                table_for(k)
            );
            sqlx::query(&query).bind(i).bind(now).execute(&mut *tx).await?;
            if was_live_booking {
                release_room(&mut tx, i).await?;
            }
            metrics::counter!("lodge_soft_deletes_total", "kind" => k.as_str()).increment(1);
            if cascade {
                stack.extend(child_records(&mut tx, k, i).await?);
            }
        }
        tx.commit().await?;
        Ok(())
    }

    async fn restore(&self, kind: RecordKind, id: i64, cascade: bool) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        if !record_exists(&mut tx, kind, id).await? {
            return Err(StoreError::NotFound(kind.as_str().into()));
        }
        let mut stack = vec![(kind, id)];
        while let Some((k, i)) = stack.pop() {
            let query = format!(
                "UPDATE {} SET is_deleted = FALSE, deleted_at = NULL WHERE id = $1",
                table_for(k)
            );
            sqlx::query(&query).bind(i).execute(&mut *tx).await?;
            if k == RecordKind::Booking {
                reoccupy_room(&mut tx, i).await?;
            }
            metrics::counter!("lodge_restores_total", "kind" => k.as_str()).increment(1);
            if cascade {
                stack.extend(child_records(&mut tx, k, i).await?);
            }
        }
        tx.commit().await?;
        Ok(())
    }

    async fn hard_delete(&self, kind: RecordKind, id: i64) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        if !record_exists(&mut tx, kind, id).await? {
            return Err(StoreError::NotFound(kind.as_str().into()));
        }
        // ON DELETE CASCADE removes referential dependents in the same
        // statement, so walk the ownership edges first: every live booking
        // that is about to go releases its room.
        let mut stack = vec![(kind, id)];
        while let Some((k, i)) = stack.pop() {
            if k == RecordKind::Booking && booking_is_live(&mut tx, i).await? {
                release_room(&mut tx, i).await?;
            }
            stack.extend(child_records(&mut tx, k, i).await?);
        }
        let query = format!("DELETE FROM {} WHERE id = $1", table_for(kind));
        sqlx::query(&query).bind(id).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn list_hotels(&self, view: RecordView) -> StoreResult<Vec<Hotel>> {
        let query = format!(
            "SELECT {HOTEL_COLUMNS} FROM hotels{} ORDER BY id",
            view_filter(view)
        );
        let rows: Vec<DbHotel> = sqlx::query_as(&query).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Hotel::from).collect())
    }

    async fn get_hotel(&self, id: i64) -> StoreResult<Hotel> {
        let query = format!("SELECT {HOTEL_COLUMNS} FROM hotels WHERE id = $1");
        let row: Option<DbHotel> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Hotel::from)
            .ok_or_else(|| StoreError::NotFound("hotel".into()))
    }

    async fn create_hotel(&self, new: NewHotel) -> StoreResult<Hotel> {
        validate_stars(new.stars)?;
        let query = format!(
            "INSERT INTO hotels (name, address, village, district, province, phone, email, stars, \
             check_in_time, check_out_time) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {HOTEL_COLUMNS}"
        );
        let row: DbHotel = sqlx::query_as(&query)
            .bind(&new.name)
            .bind(&new.address)
            .bind(&new.village)
            .bind(&new.district)
            .bind(&new.province)
            .bind(&new.phone)
            .bind(&new.email)
            .bind(new.stars)
            .bind(new.check_in_time)
            .bind(new.check_out_time)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn update_hotel(&self, id: i64, new: NewHotel) -> StoreResult<Hotel> {
        validate_stars(new.stars)?;
        let query = format!(
            "UPDATE hotels SET name = $2, address = $3, village = $4, district = $5, \
             province = $6, phone = $7, email = $8, stars = $9, check_in_time = $10, \
             check_out_time = $11 WHERE id = $1 RETURNING {HOTEL_COLUMNS}"
        );
        let row: Option<DbHotel> = sqlx::query_as(&query)
            .bind(id)
            .bind(&new.name)
            .bind(&new.address)
            .bind(&new.village)
            .bind(&new.district)
            .bind(&new.province)
            .bind(&new.phone)
            .bind(&new.email)
            .bind(new.stars)
            .bind(new.check_in_time)
            .bind(new.check_out_time)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Hotel::from)
            .ok_or_else(|| StoreError::NotFound("hotel".into()))
    }

    async fn hotel_summary(&self, id: i64) -> StoreResult<HotelSummary> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM hotels WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        if found.is_none() {
            return Err(StoreError::NotFound("hotel".into()));
        }
        let available_rooms: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM rooms \
             WHERE hotel_id = $1 AND NOT is_deleted AND status = 'available'",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        let staff_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM staff WHERE hotel_id = $1 AND NOT is_deleted")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(HotelSummary {
            hotel_id: id,
            available_rooms: available_rooms as u64,
            staff_count: staff_count as u64,
        })
    }

    async fn list_staff(&self, view: RecordView) -> StoreResult<Vec<Staff>> {
        let query = format!(
            "SELECT {STAFF_COLUMNS} FROM staff{} ORDER BY id",
            view_filter(view)
        );
        let rows: Vec<DbStaff> = sqlx::query_as(&query).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Staff::from).collect())
    }

    async fn get_staff(&self, id: i64) -> StoreResult<Staff> {
        let query = format!("SELECT {STAFF_COLUMNS} FROM staff WHERE id = $1");
        let row: Option<DbStaff> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Staff::from)
            .ok_or_else(|| StoreError::NotFound("staff".into()))
    }

    async fn create_staff(&self, new: NewStaff) -> StoreResult<Staff> {
        let mut tx = self.pool.begin().await?;
        ensure_live_hotel(&mut tx, new.hotel_id).await?;
        let query = format!(
            "INSERT INTO staff (hotel_id, first_name, last_name, position, salary, date_of_birth, \
             phone, email, hire_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {STAFF_COLUMNS}"
        );
        let row: DbStaff = sqlx::query_as(&query)
            .bind(new.hotel_id)
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(&new.position)
            .bind(new.salary)
            .bind(new.date_of_birth)
            .bind(&new.phone)
            .bind(&new.email)
            .bind(new.hire_date)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(row.into())
    }

    async fn update_staff(&self, id: i64, new: NewStaff) -> StoreResult<Staff> {
        let mut tx = self.pool.begin().await?;
        ensure_live_hotel(&mut tx, new.hotel_id).await?;
        let query = format!(
            "UPDATE staff SET hotel_id = $2, first_name = $3, last_name = $4, position = $5, \
             salary = $6, date_of_birth = $7, phone = $8, email = $9, hire_date = $10 \
             WHERE id = $1 RETURNING {STAFF_COLUMNS}"
        );
        let row: Option<DbStaff> = sqlx::query_as(&query)
            .bind(id)
            .bind(new.hotel_id)
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(&new.position)
            .bind(new.salary)
            .bind(new.date_of_birth)
            .bind(&new.phone)
            .bind(&new.email)
            .bind(new.hire_date)
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;
        row.map(Staff::from)
            .ok_or_else(|| StoreError::NotFound("staff".into()))
    }

    async fn list_guests(&self, view: RecordView) -> StoreResult<Vec<Guest>> {
        let query = format!(
            "SELECT {GUEST_COLUMNS} FROM guests{} ORDER BY id",
            view_filter(view)
        );
        let rows: Vec<DbGuest> = sqlx::query_as(&query).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Guest::from).collect())
    }

    async fn get_guest(&self, id: i64) -> StoreResult<Guest> {
        let query = format!("SELECT {GUEST_COLUMNS} FROM guests WHERE id = $1");
        let row: Option<DbGuest> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Guest::from)
            .ok_or_else(|| StoreError::NotFound("guest".into()))
    }

    async fn create_guest(&self, new: NewGuest) -> StoreResult<Guest> {
        let query = format!(
            "INSERT INTO guests (first_name, last_name, date_of_birth, address, phone, email) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {GUEST_COLUMNS}"
        );
        let row: DbGuest = sqlx::query_as(&query)
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(new.date_of_birth)
            .bind(&new.address)
            .bind(&new.phone)
            .bind(&new.email)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn update_guest(&self, id: i64, new: NewGuest) -> StoreResult<Guest> {
        let query = format!(
            "UPDATE guests SET first_name = $2, last_name = $3, date_of_birth = $4, \
             address = $5, phone = $6, email = $7 WHERE id = $1 RETURNING {GUEST_COLUMNS}"
        );
        let row: Option<DbGuest> = sqlx::query_as(&query)
            .bind(id)
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(new.date_of_birth)
            .bind(&new.address)
            .bind(&new.phone)
            .bind(&new.email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Guest::from)
            .ok_or_else(|| StoreError::NotFound("guest".into()))
    }

    async fn guest_bookings(&self, guest_id: i64) -> StoreResult<Vec<Booking>> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM guests WHERE id = $1")
            .bind(guest_id)
            .fetch_optional(&self.pool)
            .await?;
        if found.is_none() {
            return Err(StoreError::NotFound("guest".into()));
        }
        let query = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE guest_id = $1 AND NOT is_deleted ORDER BY check_in_date DESC"
        );
        let rows: Vec<DbBooking> = sqlx::query_as(&query)
            .bind(guest_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn list_room_types(&self, view: RecordView) -> StoreResult<Vec<RoomType>> {
        let query = format!(
            "SELECT {ROOM_TYPE_COLUMNS} FROM room_types{} ORDER BY id",
            view_filter(view)
        );
        let rows: Vec<DbRoomType> = sqlx::query_as(&query).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(RoomType::from).collect())
    }

    async fn get_room_type(&self, id: i64) -> StoreResult<RoomType> {
        let query = format!("SELECT {ROOM_TYPE_COLUMNS} FROM room_types WHERE id = $1");
        let row: Option<DbRoomType> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(RoomType::from)
            .ok_or_else(|| StoreError::NotFound("room_type".into()))
    }

    async fn create_room_type(&self, new: NewRoomType) -> StoreResult<RoomType> {
        let query = format!(
            "INSERT INTO room_types (name, description, price_per_night, capacity) \
             VALUES ($1, $2, $3, $4) RETURNING {ROOM_TYPE_COLUMNS}"
        );
        let row: DbRoomType = sqlx::query_as(&query)
            .bind(&new.name)
            .bind(&new.description)
            .bind(new.price_per_night)
            .bind(new.capacity)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn update_room_type(&self, id: i64, new: NewRoomType) -> StoreResult<RoomType> {
        let query = format!(
            "UPDATE room_types SET name = $2, description = $3, price_per_night = $4, \
             capacity = $5 WHERE id = $1 RETURNING {ROOM_TYPE_COLUMNS}"
        );
        let row: Option<DbRoomType> = sqlx::query_as(&query)
            .bind(id)
            .bind(&new.name)
            .bind(&new.description)
            .bind(new.price_per_night)
            .bind(new.capacity)
            .fetch_optional(&self.pool)
            .await?;
        row.map(RoomType::from)
            .ok_or_else(|| StoreError::NotFound("room_type".into()))
    }

    async fn list_rooms(&self, view: RecordView) -> StoreResult<Vec<Room>> {
        let query = format!(
            "SELECT {ROOM_COLUMNS} FROM rooms{} ORDER BY id",
            view_filter(view)
        );
        let rows: Vec<DbRoom> = sqlx::query_as(&query).fetch_all(&self.pool).await?;
        rows.into_iter().map(Room::try_from).collect()
    }

    async fn get_room(&self, id: i64) -> StoreResult<Room> {
        let query = format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = $1");
        let row: Option<DbRoom> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or_else(|| StoreError::NotFound("room".into()))?
            .try_into()
    }

    async fn create_room(&self, new: NewRoom) -> StoreResult<Room> {
        let mut tx = self.pool.begin().await?;
        ensure_live_hotel(&mut tx, new.hotel_id).await?;
        ensure_live_room_type(&mut tx, new.room_type_id).await?;
        let query = format!(
            "INSERT INTO rooms (hotel_id, room_type_id, room_number, status) \
             VALUES ($1, $2, $3, 'available') RETURNING {ROOM_COLUMNS}"
        );
        let row: DbRoom = sqlx::query_as(&query)
            .bind(new.hotel_id)
            .bind(new.room_type_id)
            .bind(&new.room_number)
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::Validation(
                        "a room with this number already exists in this hotel".into(),
                    )
                } else {
                    err.into()
                }
            })?;
        tx.commit().await?;
        row.try_into()
    }

    async fn update_room(&self, id: i64, new: NewRoom) -> StoreResult<Room> {
        let mut tx = self.pool.begin().await?;
        ensure_live_hotel(&mut tx, new.hotel_id).await?;
        ensure_live_room_type(&mut tx, new.room_type_id).await?;
        let query = format!(
            "UPDATE rooms SET hotel_id = $2, room_type_id = $3, room_number = $4 \
             WHERE id = $1 RETURNING {ROOM_COLUMNS}"
        );
        let row: Option<DbRoom> = sqlx::query_as(&query)
            .bind(id)
            .bind(new.hotel_id)
            .bind(new.room_type_id)
            .bind(&new.room_number)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::Validation(
                        "a room with this number already exists in this hotel".into(),
                    )
                } else {
                    StoreError::from(err)
                }
            })?;
        tx.commit().await?;
        row.ok_or_else(|| StoreError::NotFound("room".into()))?
            .try_into()
    }

    async fn list_bookings(&self, view: RecordView) -> StoreResult<Vec<Booking>> {
        let query = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings{} ORDER BY id",
            view_filter(view)
        );
        let rows: Vec<DbBooking> = sqlx::query_as(&query).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn get_booking(&self, id: i64) -> StoreResult<Booking> {
        let query = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1");
        let row: Option<DbBooking> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Booking::from)
            .ok_or_else(|| StoreError::NotFound("booking".into()))
    }

    async fn create_booking(&self, new: NewBooking) -> StoreResult<Booking> {
        let stay = new.stay()?;
        let mut tx = self.pool.begin().await?;
        let guest: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM guests WHERE id = $1 AND NOT is_deleted")
                .bind(new.guest_id)
                .fetch_optional(&mut *tx)
                .await?;
        if guest.is_none() {
            return Err(StoreError::Validation(format!(
                "guest {} does not exist",
                new.guest_id
            )));
        }
        // Lock the room row so concurrent requests cannot double-book.
        let room_query =
            format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = $1 AND NOT is_deleted FOR UPDATE");
        let room: Option<DbRoom> = sqlx::query_as(&room_query)
            .bind(new.room_id)
            .fetch_optional(&mut *tx)
            .await?;
        let room: Room = room
            .ok_or_else(|| StoreError::Validation(format!("room {} does not exist", new.room_id)))?
            .try_into()?;
        if room.status == RoomStatus::Occupied {
            return Err(StoreError::RoomOccupied(room.id));
        }
        let price_per_night: Decimal =
            sqlx::query_scalar("SELECT price_per_night FROM room_types WHERE id = $1")
                .bind(room.room_type_id)
                .fetch_one(&mut *tx)
                .await?;
        let total_price = stay.total_price(price_per_night);
        let insert = format!(
            "INSERT INTO bookings (guest_id, room_id, check_in_date, check_out_date, total_price) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {BOOKING_COLUMNS}"
        );
        let row: DbBooking = sqlx::query_as(&insert)
            .bind(new.guest_id)
            .bind(new.room_id)
            .bind(stay.check_in)
            .bind(stay.check_out)
            .bind(total_price)
            .fetch_one(&mut *tx)
            .await?;
        sqlx::query("UPDATE rooms SET status = 'occupied' WHERE id = $1")
            .bind(new.room_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        metrics::counter!("lodge_bookings_created_total").increment(1);
        Ok(row.into())
    }

    async fn update_booking(&self, id: i64, update: BookingUpdate) -> StoreResult<Booking> {
        let stay = update.stay()?;
        let mut tx = self.pool.begin().await?;
        let price_per_night: Option<Decimal> = sqlx::query_scalar(
            "SELECT rt.price_per_night FROM bookings b \
             JOIN rooms r ON r.id = b.room_id \
             JOIN room_types rt ON rt.id = r.room_type_id \
             WHERE b.id = $1 AND NOT b.is_deleted",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let price_per_night =
            price_per_night.ok_or_else(|| StoreError::NotFound("booking".into()))?;
        let total_price = stay.total_price(price_per_night);
        let query = format!(
            "UPDATE bookings SET check_in_date = $2, check_out_date = $3, total_price = $4 \
             WHERE id = $1 RETURNING {BOOKING_COLUMNS}"
        );
        let row: DbBooking = sqlx::query_as(&query)
            .bind(id)
            .bind(stay.check_in)
            .bind(stay.check_out)
            .bind(total_price)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(row.into())
    }

    async fn booking_balance(&self, id: i64) -> StoreResult<BookingBalance> {
        let total_price: Option<Decimal> =
            sqlx::query_scalar("SELECT total_price FROM bookings WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        let total_price = total_price.ok_or_else(|| StoreError::NotFound("booking".into()))?;
        let total_paid: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM payments \
             WHERE booking_id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(BookingBalance {
            booking_id: id,
            total_price,
            total_paid,
            outstanding: total_price - total_paid,
        })
    }

    async fn release_expired_bookings(&self, reference: NaiveDate) -> StoreResult<u64> {
        // Keyed on the latest live check-out per room so a stale past
        // booking cannot release a room that was since re-booked.
        let released = sqlx::query(
            "UPDATE rooms SET status = 'available' \
             WHERE status = 'occupied' AND id IN \
             (SELECT room_id FROM bookings WHERE NOT is_deleted \
              GROUP BY room_id HAVING MAX(check_out_date) < $1)",
        )
        .bind(reference)
        .execute(&self.pool)
        .await?
        .rows_affected();
        if released > 0 {
            metrics::counter!("lodge_rooms_released_total").increment(released);
        }
        Ok(released)
    }

    async fn list_payments(
        &self,
        view: RecordView,
        booking_id: Option<i64>,
    ) -> StoreResult<Vec<Payment>> {
        let rows: Vec<DbPayment> = match booking_id {
            Some(booking_id) => {
                let filter = match view {
                    RecordView::Live => " AND NOT is_deleted",
                    RecordView::Deleted => " AND is_deleted",
                    RecordView::All => "",
                };
                let query = format!(
                    "SELECT {PAYMENT_COLUMNS} FROM payments WHERE booking_id = $1{filter} ORDER BY id"
                );
                sqlx::query_as(&query)
                    .bind(booking_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!(
                    "SELECT {PAYMENT_COLUMNS} FROM payments{} ORDER BY id",
                    view_filter(view)
                );
                sqlx::query_as(&query).fetch_all(&self.pool).await?
            }
        };
        rows.into_iter().map(Payment::try_from).collect()
    }

    async fn get_payment(&self, id: i64) -> StoreResult<Payment> {
        let query = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1");
        let row: Option<DbPayment> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or_else(|| StoreError::NotFound("payment".into()))?
            .try_into()
    }

    async fn create_payment(&self, new: NewPayment) -> StoreResult<Payment> {
        let mut tx = self.pool.begin().await?;
        // Lock the booking row so concurrent payments cannot both observe an
        // outstanding balance.
        let total_price: Option<Decimal> = sqlx::query_scalar(
            "SELECT total_price FROM bookings WHERE id = $1 AND NOT is_deleted FOR UPDATE",
        )
        .bind(new.booking_id)
        .fetch_optional(&mut *tx)
        .await?;
        let total_price = total_price.ok_or_else(|| {
            StoreError::Validation(format!("booking {} does not exist", new.booking_id))
        })?;
        let total_paid: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM payments \
             WHERE booking_id = $1 AND NOT is_deleted",
        )
        .bind(new.booking_id)
        .fetch_one(&mut *tx)
        .await?;
        let outstanding = total_price - total_paid;
        if outstanding <= Decimal::ZERO {
            return Err(StoreError::NoOutstandingBalance(new.booking_id));
        }
        let insert = format!(
            "INSERT INTO payments (booking_id, amount, payment_date, method) \
             VALUES ($1, $2, $3, $4) RETURNING {PAYMENT_COLUMNS}"
        );
        let row: DbPayment = sqlx::query_as(&insert)
            .bind(new.booking_id)
            .bind(outstanding)
            .bind(Utc::now().date_naive())
            .bind(new.method.as_str())
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        metrics::counter!("lodge_payments_recorded_total").increment(1);
        row.try_into()
    }

    async fn list_users(&self, view: RecordView) -> StoreResult<Vec<User>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users{} ORDER BY id",
            view_filter(view)
        );
        let rows: Vec<DbUser> = sqlx::query_as(&query).fetch_all(&self.pool).await?;
        let memberships: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT user_id, group_id FROM user_group_memberships ORDER BY user_id, group_id",
        )
        .fetch_all(&self.pool)
        .await?;
        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            let group_ids = memberships
                .iter()
                .filter(|(user_id, _)| *user_id == row.id)
                .map(|(_, group_id)| *group_id)
                .collect();
            users.push(row.into_user(group_ids));
        }
        Ok(users)
    }

    async fn get_user(&self, id: i64) -> StoreResult<User> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row: Option<DbUser> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        let row = row.ok_or_else(|| StoreError::NotFound("user".into()))?;
        let mut conn = self.pool.acquire().await?;
        let group_ids = group_ids_for_user(&mut conn, id).await?;
        Ok(row.into_user(group_ids))
    }

    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let mut tx = self.pool.begin().await?;
        ensure_groups_exist(&mut tx, &new.group_ids).await?;
        let insert = format!(
            "INSERT INTO users (username, lastname, email, is_active, is_staff, date_joined) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}"
        );
        let row: DbUser = sqlx::query_as(&insert)
            .bind(&new.username)
            .bind(&new.lastname)
            .bind(&new.email)
            .bind(new.is_active)
            .bind(new.is_staff)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::Conflict("username or email already taken".into())
                } else {
                    StoreError::from(err)
                }
            })?;
        for group_id in &new.group_ids {
            sqlx::query(
                "INSERT INTO user_group_memberships (user_id, group_id) \
                 VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(row.id)
            .bind(group_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        let group_ids = new.group_ids.clone();
        Ok(row.into_user(group_ids))
    }

    async fn update_user(&self, id: i64, new: NewUser) -> StoreResult<User> {
        let mut tx = self.pool.begin().await?;
        ensure_groups_exist(&mut tx, &new.group_ids).await?;
        let update = format!(
            "UPDATE users SET username = $2, lastname = $3, email = $4, is_active = $5, \
             is_staff = $6 WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let row: Option<DbUser> = sqlx::query_as(&update)
            .bind(id)
            .bind(&new.username)
            .bind(&new.lastname)
            .bind(&new.email)
            .bind(new.is_active)
            .bind(new.is_staff)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::Conflict("username or email already taken".into())
                } else {
                    StoreError::from(err)
                }
            })?;
        let row = row.ok_or_else(|| StoreError::NotFound("user".into()))?;
        sqlx::query("DELETE FROM user_group_memberships WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for group_id in &new.group_ids {
            sqlx::query(
                "INSERT INTO user_group_memberships (user_id, group_id) \
                 VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(id)
            .bind(group_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(row.into_user(new.group_ids))
    }

    async fn list_groups(&self) -> StoreResult<Vec<Group>> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM auth_groups ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        let grants: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT group_id, permission_id FROM group_permission_grants ORDER BY group_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| Group {
                id,
                name,
                permission_ids: grants
                    .iter()
                    .filter(|(group_id, _)| *group_id == id)
                    .map(|(_, permission_id)| *permission_id)
                    .collect(),
            })
            .collect())
    }

    async fn get_group(&self, id: i64) -> StoreResult<Group> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM auth_groups WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        let (id, name) = row.ok_or_else(|| StoreError::NotFound("group".into()))?;
        let mut conn = self.pool.acquire().await?;
        let permission_ids = permission_ids_for_group(&mut conn, id).await?;
        Ok(Group {
            id,
            name,
            permission_ids,
        })
    }

    async fn create_group(&self, new: NewGroup) -> StoreResult<Group> {
        let mut tx = self.pool.begin().await?;
        ensure_permissions_exist(&mut tx, &new.permission_ids).await?;
        let row: (i64,) = sqlx::query_as("INSERT INTO auth_groups (name) VALUES ($1) RETURNING id")
            .bind(&new.name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::Conflict("group name already exists".into())
                } else {
                    StoreError::from(err)
                }
            })?;
        for permission_id in &new.permission_ids {
            sqlx::query(
                "INSERT INTO group_permission_grants (group_id, permission_id) \
                 VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(row.0)
            .bind(permission_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(Group {
            id: row.0,
            name: new.name,
            permission_ids: new.permission_ids,
        })
    }

    async fn update_group(&self, id: i64, new: NewGroup) -> StoreResult<Group> {
        let mut tx = self.pool.begin().await?;
        ensure_permissions_exist(&mut tx, &new.permission_ids).await?;
        let row: Option<(i64,)> =
            sqlx::query_as("UPDATE auth_groups SET name = $2 WHERE id = $1 RETURNING id")
                .bind(id)
                .bind(&new.name)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        StoreError::Conflict("group name already exists".into())
                    } else {
                        StoreError::from(err)
                    }
                })?;
        if row.is_none() {
            return Err(StoreError::NotFound("group".into()));
        }
        sqlx::query("DELETE FROM group_permission_grants WHERE group_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for permission_id in &new.permission_ids {
            sqlx::query(
                "INSERT INTO group_permission_grants (group_id, permission_id) \
                 VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(id)
            .bind(permission_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(Group {
            id,
            name: new.name,
            permission_ids: new.permission_ids,
        })
    }

    async fn delete_group(&self, id: i64) -> StoreResult<()> {
        let deleted = sqlx::query("DELETE FROM auth_groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(StoreError::NotFound("group".into()));
        }
        Ok(())
    }

    async fn list_permissions(&self) -> StoreResult<Vec<Permission>> {
        let rows: Vec<(i64, String, String)> =
            sqlx::query_as("SELECT id, name, code FROM auth_permissions ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name, code)| Permission { id, name, code })
            .collect())
    }

    async fn get_permission(&self, id: i64) -> StoreResult<Permission> {
        let row: Option<(i64, String, String)> =
            sqlx::query_as("SELECT id, name, code FROM auth_permissions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(|(id, name, code)| Permission { id, name, code })
            .ok_or_else(|| StoreError::NotFound("permission".into()))
    }

    async fn create_permission(&self, new: NewPermission) -> StoreResult<Permission> {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO auth_permissions (name, code) VALUES ($1, $2) RETURNING id",
        )
        .bind(&new.name)
        .bind(&new.code)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                StoreError::Conflict("permission name or code already exists".into())
            } else {
                StoreError::from(err)
            }
        })?;
        Ok(Permission {
            id: row.0,
            name: new.name,
            code: new.code,
        })
    }

    async fn update_permission(&self, id: i64, new: NewPermission) -> StoreResult<Permission> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE auth_permissions SET name = $2, code = $3 WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                StoreError::Conflict("permission name or code already exists".into())
            } else {
                StoreError::from(err)
            }
        })?;
        if row.is_none() {
            return Err(StoreError::NotFound("permission".into()));
        }
        Ok(Permission {
            id,
            name: new.name,
            code: new.code,
        })
    }

    async fn delete_permission(&self, id: i64) -> StoreResult<()> {
        let deleted = sqlx::query("DELETE FROM auth_permissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(StoreError::NotFound("permission".into()));
        }
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

// Integration tests against a live Postgres. Run with:
//   LODGE_TEST_DATABASE_URL=postgres://... cargo test --features pg-tests
#[cfg(all(test, feature = "pg-tests"))]
mod tests {
    use super::*;
    use crate::model::NewBooking;
    use chrono::NaiveTime;
    use serial_test::serial;

    async fn fresh_store() -> PostgresStore {
        let url = std::env::var("LODGE_TEST_DATABASE_URL").expect("LODGE_TEST_DATABASE_URL");
        let store = PostgresStore::connect(&PostgresConfig {
            url,
            max_connections: 4,
            acquire_timeout_ms: 2_000,
        })
        .await
        .expect("connect");
        sqlx::query(
            "TRUNCATE hotels, guests, room_types, users, auth_groups, auth_permissions \
             RESTART IDENTITY CASCADE",
        )
        .execute(&store.pool)
        .await
        .expect("truncate");
        store
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    async fn seed(store: &PostgresStore) -> (Hotel, Room, Guest) {
        let hotel = store
            .create_hotel(NewHotel {
                name: "Riverside".into(),
                address: "1 Beach Road".into(),
                village: "Vang Vieng".into(),
                district: "Central".into(),
                province: "Vientiane".into(),
                phone: "+856 20 555 0101".into(),
                email: "stay@example.com".into(),
                stars: 4,
                check_in_time: NaiveTime::from_hms_opt(14, 0, 0).expect("time"),
                check_out_time: NaiveTime::from_hms_opt(12, 0, 0).expect("time"),
            })
            .await
            .expect("hotel");
        let room_type = store
            .create_room_type(NewRoomType {
                name: "Standard".into(),
                description: "Queen bed".into(),
                price_per_night: Decimal::from(100),
                capacity: 2,
            })
            .await
            .expect("room type");
        let room = store
            .create_room(NewRoom {
                hotel_id: hotel.id,
                room_type_id: room_type.id,
                room_number: "R101".into(),
            })
            .await
            .expect("room");
        let guest = store
            .create_guest(NewGuest {
                first_name: "Mala".into(),
                last_name: "Sisavath".into(),
                date_of_birth: date(1990, 5, 12),
                address: "14 River Lane".into(),
                phone: "+856 20 555 0102".into(),
                email: "mala@example.com".into(),
            })
            .await
            .expect("guest");
        (hotel, room, guest)
    }

    #[tokio::test]
    #[serial]
    async fn booking_flow_round_trips() {
        let store = fresh_store().await;
        let (_, room, guest) = seed(&store).await;

        let booking = store
            .create_booking(NewBooking {
                guest_id: guest.id,
                room_id: room.id,
                check_in_date: date(2024, 6, 1),
                check_out_date: Some(date(2024, 6, 4)),
                number_of_days: None,
            })
            .await
            .expect("booking");
        assert_eq!(booking.total_price, Decimal::from(300));
        assert_eq!(
            store.get_room(room.id).await.expect("room").status,
            RoomStatus::Occupied
        );

        let payment = store
            .create_payment(NewPayment {
                booking_id: booking.id,
                method: PaymentMethod::Cash,
            })
            .await
            .expect("payment");
        assert_eq!(payment.amount, Decimal::from(300));
        let err = store
            .create_payment(NewPayment {
                booking_id: booking.id,
                method: PaymentMethod::Cash,
            })
            .await
            .expect_err("fully paid");
        assert!(matches!(err, StoreError::NoOutstandingBalance(_)));
    }

    #[tokio::test]
    #[serial]
    async fn cascade_soft_delete_and_restore() {
        let store = fresh_store().await;
        let (hotel, room, guest) = seed(&store).await;
        let booking = store
            .create_booking(NewBooking {
                guest_id: guest.id,
                room_id: room.id,
                check_in_date: date(2024, 6, 1),
                check_out_date: Some(date(2024, 6, 4)),
                number_of_days: None,
            })
            .await
            .expect("booking");

        store
            .soft_delete(RecordKind::Hotel, hotel.id, true)
            .await
            .expect("cascade delete");
        assert!(store.get_room(room.id).await.expect("room").is_deleted);
        assert!(store
            .get_booking(booking.id)
            .await
            .expect("booking")
            .is_deleted);
        assert_eq!(
            store.get_room(room.id).await.expect("room").status,
            RoomStatus::Available
        );

        store
            .restore(RecordKind::Hotel, hotel.id, true)
            .await
            .expect("cascade restore");
        assert!(!store.get_room(room.id).await.expect("room").is_deleted);
        assert_eq!(
            store.get_room(room.id).await.expect("room").status,
            RoomStatus::Occupied
        );
    }

    #[tokio::test]
    #[serial]
    async fn hard_deleting_a_guest_releases_the_booked_room() {
        let store = fresh_store().await;
        let (_, room, guest) = seed(&store).await;
        store
            .create_booking(NewBooking {
                guest_id: guest.id,
                room_id: room.id,
                check_in_date: date(2024, 6, 1),
                check_out_date: Some(date(2024, 6, 4)),
                number_of_days: None,
            })
            .await
            .expect("booking");

        // The booking goes via ON DELETE CASCADE; the room must not be left
        // occupied with nothing to release it.
        store
            .hard_delete(RecordKind::Guest, guest.id)
            .await
            .expect("hard delete");
        assert!(store
            .list_bookings(RecordView::All)
            .await
            .expect("bookings")
            .is_empty());
        assert_eq!(
            store.get_room(room.id).await.expect("room").status,
            RoomStatus::Available
        );
    }
}
