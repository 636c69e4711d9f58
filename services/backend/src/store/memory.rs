//! In-memory implementation of the hotel store.
//!
//! # Purpose
//! Implements [`HotelStore`] entirely in memory using `BTreeMap` tables
//! guarded by a single `tokio::sync::RwLock`. It exists for:
//! - local development and tests (no external dependencies)
//! - deployments where durability is not required
//!
//! # Consistency
//! - **Not durable**: all state is lost on process restart.
//! - Every mutating operation takes the write lock for its whole duration, so
//!   a cascade walk, a booking creation (availability check + status flip +
//!   price computation), or a payment creation (balance check + insert) is
//!   atomic with respect to concurrent requests. Partial cascades are never
//!   observable.
//!
//! # Soft delete
//! Live and deleted records share one table; views are filters over the
//! `is_deleted` flag. Cascade walks follow the static ownership-edge table on
//! [`RecordKind`] with an explicit worklist. Hard deletes remove the row and
//! its referential dependents, mirroring the `ON DELETE CASCADE` constraints
//! the Postgres backend gets from its schema.
use super::{HotelStore, StoreError, StoreResult};
use crate::model::{
    Booking, BookingBalance, BookingUpdate, Deletable, Group, Guest, Hotel, HotelSummary,
    NewBooking, NewGroup, NewGuest, NewHotel, NewPayment, NewPermission, NewRoom, NewRoomType,
    NewStaff, NewUser, Payment, Permission, RecordKind, RecordView, Room, RoomStatus, RoomType,
    Staff, User,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// One record table. Ids are assigned from a per-table counter and never
/// reused, so a hard-deleted id stays dead.
#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }

    fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    fn remove(&mut self, id: i64) -> Option<T> {
        self.rows.remove(&id)
    }

    fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }
}

impl<T: Clone + Deletable> Table<T> {
    fn list(&self, view: RecordView) -> Vec<T> {
        self.rows
            .values()
            .filter(|row| view.matches(row.is_deleted()))
            .cloned()
            .collect()
    }

    /// Single-record lookup: live first, transparently falling back to the
    /// deleted partition so soft-deleted records stay addressable.
    fn fetch(&self, id: i64, kind: RecordKind) -> StoreResult<T> {
        self.rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(kind.as_str().into()))
    }

    fn fetch_live(&self, id: i64, kind: RecordKind) -> StoreResult<T> {
        match self.rows.get(&id) {
            Some(row) if !row.is_deleted() => Ok(row.clone()),
            _ => Err(StoreError::NotFound(kind.as_str().into())),
        }
    }
}

#[derive(Debug)]
struct State {
    hotels: Table<Hotel>,
    staff: Table<Staff>,
    guests: Table<Guest>,
    room_types: Table<RoomType>,
    rooms: Table<Room>,
    bookings: Table<Booking>,
    payments: Table<Payment>,
    users: Table<User>,
    groups: Table<Group>,
    permissions: Table<Permission>,
}

impl State {
    fn new() -> Self {
        Self {
            hotels: Table::new(),
            staff: Table::new(),
            guests: Table::new(),
            room_types: Table::new(),
            rooms: Table::new(),
            bookings: Table::new(),
            payments: Table::new(),
            users: Table::new(),
            groups: Table::new(),
            permissions: Table::new(),
        }
    }

    fn contains(&self, kind: RecordKind, id: i64) -> bool {
        match kind {
            RecordKind::Hotel => self.hotels.get(id).is_some(),
            RecordKind::Staff => self.staff.get(id).is_some(),
            RecordKind::Guest => self.guests.get(id).is_some(),
            RecordKind::RoomType => self.room_types.get(id).is_some(),
            RecordKind::Room => self.rooms.get(id).is_some(),
            RecordKind::Booking => self.bookings.get(id).is_some(),
            RecordKind::Payment => self.payments.get(id).is_some(),
            RecordKind::User => self.users.get(id).is_some(),
        }
    }

    /// Direct dependents of a record along the static ownership edges,
    /// regardless of their own deletion state.
    fn children_of(&self, kind: RecordKind, id: i64) -> Vec<(RecordKind, i64)> {
        let mut children = Vec::new();
        for owned in kind.owned_kinds() {
            match owned {
                RecordKind::Staff => children.extend(
                    self.staff
                        .values()
                        .filter(|s| s.hotel_id == id)
                        .map(|s| (RecordKind::Staff, s.id)),
                ),
                RecordKind::Room => {
                    let by_hotel = kind == RecordKind::Hotel;
                    children.extend(
                        self.rooms
                            .values()
                            .filter(|r| {
                                if by_hotel {
                                    r.hotel_id == id
                                } else {
                                    r.room_type_id == id
                                }
                            })
                            .map(|r| (RecordKind::Room, r.id)),
                    );
                }
                RecordKind::Booking => {
                    let by_guest = kind == RecordKind::Guest;
                    children.extend(
                        self.bookings
                            .values()
                            .filter(|b| {
                                if by_guest {
                                    b.guest_id == id
                                } else {
                                    b.room_id == id
                                }
                            })
                            .map(|b| (RecordKind::Booking, b.id)),
                    );
                }
                RecordKind::Payment => children.extend(
                    self.payments
                        .values()
                        .filter(|p| p.booking_id == id)
                        .map(|p| (RecordKind::Payment, p.id)),
                ),
                // No other kind appears as an edge target.
                _ => {}
            }
        }
        children
    }

    fn apply_delete(&mut self, kind: RecordKind, id: i64, at: DateTime<Utc>) {
        match kind {
            RecordKind::Hotel => {
                if let Some(row) = self.hotels.get_mut(id) {
                    row.mark_deleted(at);
                }
            }
            RecordKind::Staff => {
                if let Some(row) = self.staff.get_mut(id) {
                    row.mark_deleted(at);
                }
            }
            RecordKind::Guest => {
                if let Some(row) = self.guests.get_mut(id) {
                    row.mark_deleted(at);
                }
            }
            RecordKind::RoomType => {
                if let Some(row) = self.room_types.get_mut(id) {
                    row.mark_deleted(at);
                }
            }
            RecordKind::Room => {
                if let Some(row) = self.rooms.get_mut(id) {
                    row.mark_deleted(at);
                }
            }
            RecordKind::Booking => {
                if let Some(row) = self.bookings.get_mut(id) {
                    row.mark_deleted(at);
                }
            }
            RecordKind::Payment => {
                if let Some(row) = self.payments.get_mut(id) {
                    row.mark_deleted(at);
                }
            }
            RecordKind::User => {
                if let Some(row) = self.users.get_mut(id) {
                    row.mark_deleted(at);
                }
            }
        }
    }

    fn apply_restore(&mut self, kind: RecordKind, id: i64) {
        match kind {
            RecordKind::Hotel => {
                if let Some(row) = self.hotels.get_mut(id) {
                    row.mark_restored();
                }
            }
            RecordKind::Staff => {
                if let Some(row) = self.staff.get_mut(id) {
                    row.mark_restored();
                }
            }
            RecordKind::Guest => {
                if let Some(row) = self.guests.get_mut(id) {
                    row.mark_restored();
                }
            }
            RecordKind::RoomType => {
                if let Some(row) = self.room_types.get_mut(id) {
                    row.mark_restored();
                }
            }
            RecordKind::Room => {
                if let Some(row) = self.rooms.get_mut(id) {
                    row.mark_restored();
                }
            }
            RecordKind::Booking => {
                if let Some(row) = self.bookings.get_mut(id) {
                    row.mark_restored();
                }
            }
            RecordKind::Payment => {
                if let Some(row) = self.payments.get_mut(id) {
                    row.mark_restored();
                }
            }
            RecordKind::User => {
                if let Some(row) = self.users.get_mut(id) {
                    row.mark_restored();
                }
            }
        }
    }

    fn remove(&mut self, kind: RecordKind, id: i64) -> bool {
        match kind {
            RecordKind::Hotel => self.hotels.remove(id).is_some(),
            RecordKind::Staff => self.staff.remove(id).is_some(),
            RecordKind::Guest => self.guests.remove(id).is_some(),
            RecordKind::RoomType => self.room_types.remove(id).is_some(),
            RecordKind::Room => self.rooms.remove(id).is_some(),
            RecordKind::Booking => self.bookings.remove(id).is_some(),
            RecordKind::Payment => self.payments.remove(id).is_some(),
            RecordKind::User => self.users.remove(id).is_some(),
        }
    }

    /// Booking post-delete hook: release the room so the status machine stays
    /// consistent with booking lifecycle events.
    fn release_room_of_booking(&mut self, booking_id: i64) {
        let Some(room_id) = self.bookings.get(booking_id).map(|b| b.room_id) else {
            return;
        };
        if let Some(room) = self.rooms.get_mut(room_id) {
            room.status = RoomStatus::Available;
        }
    }

    /// Booking post-restore hook: re-occupy the room when it is free; leave
    /// it alone (and log) when something else took it in the meantime.
    fn reoccupy_room_of_booking(&mut self, booking_id: i64) {
        let Some(room_id) = self.bookings.get(booking_id).map(|b| b.room_id) else {
            return;
        };
        match self.rooms.get_mut(room_id) {
            Some(room) if room.status == RoomStatus::Available => {
                room.status = RoomStatus::Occupied;
            }
            Some(_) => {
                tracing::warn!(booking_id, room_id, "restored booking into an occupied room");
            }
            None => {}
        }
    }

    fn live_payments_total(&self, booking_id: i64) -> Decimal {
        self.payments
            .values()
            .filter(|p| p.booking_id == booking_id && !p.is_deleted)
            .map(|p| p.amount)
            .sum()
    }

    fn room_number_taken(&self, hotel_id: i64, room_number: &str, exclude: Option<i64>) -> bool {
        self.rooms.values().any(|r| {
            r.hotel_id == hotel_id
                && r.room_number == room_number
                && Some(r.id) != exclude
        })
    }
}

pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State::new())),
        }
    }
}

#[async_trait]
impl HotelStore for InMemoryStore {
    async fn soft_delete(&self, kind: RecordKind, id: i64, cascade: bool) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if !state.contains(kind, id) {
            return Err(StoreError::NotFound(kind.as_str().into()));
        }
        let now = Utc::now();
        // Worklist walk over the static ownership edges. Deleting an
        // already-deleted record just refreshes its timestamp.
        let mut stack = vec![(kind, id)];
        while let Some((k, i)) = stack.pop() {
            // Only a live booking holds its room occupied; re-deleting an
            // already-deleted one must not touch the room's current state.
            let was_live_booking =
                k == RecordKind::Booking && state.bookings.get(i).is_some_and(|b| !b.is_deleted);
            state.apply_delete(k, i, now);
            if was_live_booking {
                state.release_room_of_booking(i);
            }
            metrics::counter!("lodge_soft_deletes_total", "kind" => k.as_str()).increment(1);
            if cascade {
                stack.extend(state.children_of(k, i));
            }
        }
        Ok(())
    }

    async fn restore(&self, kind: RecordKind, id: i64, cascade: bool) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if !state.contains(kind, id) {
            return Err(StoreError::NotFound(kind.as_str().into()));
        }
        let mut stack = vec![(kind, id)];
        while let Some((k, i)) = stack.pop() {
            state.apply_restore(k, i);
            if k == RecordKind::Booking {
                state.reoccupy_room_of_booking(i);
            }
            metrics::counter!("lodge_restores_total", "kind" => k.as_str()).increment(1);
            if cascade {
                stack.extend(state.children_of(k, i));
            }
        }
        Ok(())
    }

    async fn hard_delete(&self, kind: RecordKind, id: i64) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if !state.contains(kind, id) {
            return Err(StoreError::NotFound(kind.as_str().into()));
        }
        // Physical removal takes referential dependents with it, matching the
        // ON DELETE CASCADE constraints of the Postgres schema. Every live
        // booking that goes, directly or as a dependent, releases its room.
        let mut stack = vec![(kind, id)];
        while let Some((k, i)) = stack.pop() {
            stack.extend(state.children_of(k, i));
            if k == RecordKind::Booking && state.bookings.get(i).is_some_and(|b| !b.is_deleted) {
                state.release_room_of_booking(i);
            }
            state.remove(k, i);
        }
        Ok(())
    }

    async fn list_hotels(&self, view: RecordView) -> StoreResult<Vec<Hotel>> {
        Ok(self.state.read().await.hotels.list(view))
    }

    async fn get_hotel(&self, id: i64) -> StoreResult<Hotel> {
        self.state.read().await.hotels.fetch(id, RecordKind::Hotel)
    }

    async fn create_hotel(&self, new: NewHotel) -> StoreResult<Hotel> {
        validate_stars(new.stars)?;
        let mut state = self.state.write().await;
        Ok(state.hotels.insert_with(|id| Hotel {
            id,
            name: new.name,
            address: new.address,
            village: new.village,
            district: new.district,
            province: new.province,
            phone: new.phone,
            email: new.email,
            stars: new.stars,
            check_in_time: new.check_in_time,
            check_out_time: new.check_out_time,
            is_deleted: false,
            deleted_at: None,
        }))
    }

    async fn update_hotel(&self, id: i64, new: NewHotel) -> StoreResult<Hotel> {
        validate_stars(new.stars)?;
        let mut state = self.state.write().await;
        let hotel = state
            .hotels
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound("hotel".into()))?;
        hotel.name = new.name;
        hotel.address = new.address;
        hotel.village = new.village;
        hotel.district = new.district;
        hotel.province = new.province;
        hotel.phone = new.phone;
        hotel.email = new.email;
        hotel.stars = new.stars;
        hotel.check_in_time = new.check_in_time;
        hotel.check_out_time = new.check_out_time;
        Ok(hotel.clone())
    }

    async fn hotel_summary(&self, id: i64) -> StoreResult<HotelSummary> {
        let state = self.state.read().await;
        state.hotels.fetch(id, RecordKind::Hotel)?;
        let available_rooms = state
            .rooms
            .values()
            .filter(|r| r.hotel_id == id && !r.is_deleted && r.status == RoomStatus::Available)
            .count() as u64;
        let staff_count = state
            .staff
            .values()
            .filter(|s| s.hotel_id == id && !s.is_deleted)
            .count() as u64;
        Ok(HotelSummary {
            hotel_id: id,
            available_rooms,
            staff_count,
        })
    }

    async fn list_staff(&self, view: RecordView) -> StoreResult<Vec<Staff>> {
        Ok(self.state.read().await.staff.list(view))
    }

    async fn get_staff(&self, id: i64) -> StoreResult<Staff> {
        self.state.read().await.staff.fetch(id, RecordKind::Staff)
    }

    async fn create_staff(&self, new: NewStaff) -> StoreResult<Staff> {
        let mut state = self.state.write().await;
        ensure_live_hotel(&state, new.hotel_id)?;
        Ok(state.staff.insert_with(|id| Staff {
            id,
            hotel_id: new.hotel_id,
            first_name: new.first_name,
            last_name: new.last_name,
            position: new.position,
            salary: new.salary,
            date_of_birth: new.date_of_birth,
            phone: new.phone,
            email: new.email,
            hire_date: new.hire_date,
            is_deleted: false,
            deleted_at: None,
        }))
    }

    async fn update_staff(&self, id: i64, new: NewStaff) -> StoreResult<Staff> {
        let mut state = self.state.write().await;
        ensure_live_hotel(&state, new.hotel_id)?;
        let staff = state
            .staff
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound("staff".into()))?;
        staff.hotel_id = new.hotel_id;
        staff.first_name = new.first_name;
        staff.last_name = new.last_name;
        staff.position = new.position;
        staff.salary = new.salary;
        staff.date_of_birth = new.date_of_birth;
        staff.phone = new.phone;
        staff.email = new.email;
        staff.hire_date = new.hire_date;
        Ok(staff.clone())
    }

    async fn list_guests(&self, view: RecordView) -> StoreResult<Vec<Guest>> {
        Ok(self.state.read().await.guests.list(view))
    }

    async fn get_guest(&self, id: i64) -> StoreResult<Guest> {
        self.state.read().await.guests.fetch(id, RecordKind::Guest)
    }

    async fn create_guest(&self, new: NewGuest) -> StoreResult<Guest> {
        let mut state = self.state.write().await;
        Ok(state.guests.insert_with(|id| Guest {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            date_of_birth: new.date_of_birth,
            address: new.address,
            phone: new.phone,
            email: new.email,
            is_deleted: false,
            deleted_at: None,
        }))
    }

    async fn update_guest(&self, id: i64, new: NewGuest) -> StoreResult<Guest> {
        let mut state = self.state.write().await;
        let guest = state
            .guests
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound("guest".into()))?;
        guest.first_name = new.first_name;
        guest.last_name = new.last_name;
        guest.date_of_birth = new.date_of_birth;
        guest.address = new.address;
        guest.phone = new.phone;
        guest.email = new.email;
        Ok(guest.clone())
    }

    async fn guest_bookings(&self, guest_id: i64) -> StoreResult<Vec<Booking>> {
        let state = self.state.read().await;
        state.guests.fetch(guest_id, RecordKind::Guest)?;
        let mut bookings: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| b.guest_id == guest_id && !b.is_deleted)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.check_in_date.cmp(&a.check_in_date));
        Ok(bookings)
    }

    async fn list_room_types(&self, view: RecordView) -> StoreResult<Vec<RoomType>> {
        Ok(self.state.read().await.room_types.list(view))
    }

    async fn get_room_type(&self, id: i64) -> StoreResult<RoomType> {
        self.state
            .read()
            .await
            .room_types
            .fetch(id, RecordKind::RoomType)
    }

    async fn create_room_type(&self, new: NewRoomType) -> StoreResult<RoomType> {
        let mut state = self.state.write().await;
        Ok(state.room_types.insert_with(|id| RoomType {
            id,
            name: new.name,
            description: new.description,
            price_per_night: new.price_per_night,
            capacity: new.capacity,
            is_deleted: false,
            deleted_at: None,
        }))
    }

    async fn update_room_type(&self, id: i64, new: NewRoomType) -> StoreResult<RoomType> {
        let mut state = self.state.write().await;
        let room_type = state
            .room_types
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound("room_type".into()))?;
        room_type.name = new.name;
        room_type.description = new.description;
        room_type.price_per_night = new.price_per_night;
        room_type.capacity = new.capacity;
        Ok(room_type.clone())
    }

    async fn list_rooms(&self, view: RecordView) -> StoreResult<Vec<Room>> {
        Ok(self.state.read().await.rooms.list(view))
    }

    async fn get_room(&self, id: i64) -> StoreResult<Room> {
        self.state.read().await.rooms.fetch(id, RecordKind::Room)
    }

    async fn create_room(&self, new: NewRoom) -> StoreResult<Room> {
        let mut state = self.state.write().await;
        ensure_live_hotel(&state, new.hotel_id)?;
        state
            .room_types
            .fetch_live(new.room_type_id, RecordKind::RoomType)
            .map_err(|_| {
                StoreError::Validation(format!("room type {} does not exist", new.room_type_id))
            })?;
        if state.room_number_taken(new.hotel_id, &new.room_number, None) {
            return Err(StoreError::Validation(
                "a room with this number already exists in this hotel".into(),
            ));
        }
        Ok(state.rooms.insert_with(|id| Room {
            id,
            hotel_id: new.hotel_id,
            room_type_id: new.room_type_id,
            room_number: new.room_number,
            status: RoomStatus::Available,
            is_deleted: false,
            deleted_at: None,
        }))
    }

    async fn update_room(&self, id: i64, new: NewRoom) -> StoreResult<Room> {
        let mut state = self.state.write().await;
        ensure_live_hotel(&state, new.hotel_id)?;
        state
            .room_types
            .fetch_live(new.room_type_id, RecordKind::RoomType)
            .map_err(|_| {
                StoreError::Validation(format!("room type {} does not exist", new.room_type_id))
            })?;
        if state.room_number_taken(new.hotel_id, &new.room_number, Some(id)) {
            return Err(StoreError::Validation(
                "a room with this number already exists in this hotel".into(),
            ));
        }
        let room = state
            .rooms
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound("room".into()))?;
        room.hotel_id = new.hotel_id;
        room.room_type_id = new.room_type_id;
        room.room_number = new.room_number;
        Ok(room.clone())
    }

    async fn list_bookings(&self, view: RecordView) -> StoreResult<Vec<Booking>> {
        Ok(self.state.read().await.bookings.list(view))
    }

    async fn get_booking(&self, id: i64) -> StoreResult<Booking> {
        self.state
            .read()
            .await
            .bookings
            .fetch(id, RecordKind::Booking)
    }

    async fn create_booking(&self, new: NewBooking) -> StoreResult<Booking> {
        let stay = new.stay()?;
        let mut state = self.state.write().await;
        state
            .guests
            .fetch_live(new.guest_id, RecordKind::Guest)
            .map_err(|_| StoreError::Validation(format!("guest {} does not exist", new.guest_id)))?;
        let room = state
            .rooms
            .fetch_live(new.room_id, RecordKind::Room)
            .map_err(|_| StoreError::Validation(format!("room {} does not exist", new.room_id)))?;
        if room.status == RoomStatus::Occupied {
            return Err(StoreError::RoomOccupied(room.id));
        }
        let room_type = state
            .room_types
            .fetch(room.room_type_id, RecordKind::RoomType)?;
        let total_price = stay.total_price(room_type.price_per_night);
        let booking = state.bookings.insert_with(|id| Booking {
            id,
            guest_id: new.guest_id,
            room_id: new.room_id,
            check_in_date: stay.check_in,
            check_out_date: stay.check_out,
            number_of_days: stay.nights(),
            total_price,
            is_deleted: false,
            deleted_at: None,
        });
        if let Some(room) = state.rooms.get_mut(new.room_id) {
            room.status = RoomStatus::Occupied;
        }
        metrics::counter!("lodge_bookings_created_total").increment(1);
        Ok(booking)
    }

    async fn update_booking(&self, id: i64, update: BookingUpdate) -> StoreResult<Booking> {
        let stay = update.stay()?;
        let mut state = self.state.write().await;
        let booking = state.bookings.fetch_live(id, RecordKind::Booking)?;
        let room = state.rooms.fetch(booking.room_id, RecordKind::Room)?;
        let room_type = state
            .room_types
            .fetch(room.room_type_id, RecordKind::RoomType)?;
        let total_price = stay.total_price(room_type.price_per_night);
        let booking = state
            .bookings
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound("booking".into()))?;
        booking.check_in_date = stay.check_in;
        booking.check_out_date = stay.check_out;
        booking.number_of_days = stay.nights();
        booking.total_price = total_price;
        Ok(booking.clone())
    }

    async fn booking_balance(&self, id: i64) -> StoreResult<BookingBalance> {
        let state = self.state.read().await;
        let booking = state.bookings.fetch(id, RecordKind::Booking)?;
        let total_paid = state.live_payments_total(id);
        Ok(BookingBalance {
            booking_id: id,
            total_price: booking.total_price,
            total_paid,
            outstanding: booking.total_price - total_paid,
        })
    }

    async fn release_expired_bookings(&self, reference: NaiveDate) -> StoreResult<u64> {
        let mut state = self.state.write().await;
        // The latest check-out among a room's live bookings decides: a stale
        // past booking must not release a room that was since re-booked.
        let mut latest_check_out: BTreeMap<i64, NaiveDate> = BTreeMap::new();
        for booking in state.bookings.values().filter(|b| !b.is_deleted) {
            let entry = latest_check_out
                .entry(booking.room_id)
                .or_insert(booking.check_out_date);
            *entry = (*entry).max(booking.check_out_date);
        }
        let mut released = 0;
        for (room_id, check_out) in latest_check_out {
            if check_out >= reference {
                continue;
            }
            if let Some(room) = state.rooms.get_mut(room_id) {
                if room.status == RoomStatus::Occupied {
                    room.status = RoomStatus::Available;
                    released += 1;
                }
            }
        }
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
        let state = self.state.read().await;
        Ok(state
            .payments
            .list(view)
            .into_iter()
            .filter(|p| booking_id.is_none_or(|id| p.booking_id == id))
            .collect())
    }

    async fn get_payment(&self, id: i64) -> StoreResult<Payment> {
        self.state
            .read()
            .await
            .payments
            .fetch(id, RecordKind::Payment)
    }

    async fn create_payment(&self, new: NewPayment) -> StoreResult<Payment> {
        let mut state = self.state.write().await;
        let booking = state
            .bookings
            .fetch_live(new.booking_id, RecordKind::Booking)
            .map_err(|_| {
                StoreError::Validation(format!("booking {} does not exist", new.booking_id))
            })?;
        let outstanding = booking.total_price - state.live_payments_total(new.booking_id);
        if outstanding <= Decimal::ZERO {
            return Err(StoreError::NoOutstandingBalance(new.booking_id));
        }
        let payment = state.payments.insert_with(|id| Payment {
            id,
            booking_id: new.booking_id,
            amount: outstanding,
            payment_date: Utc::now().date_naive(),
            method: new.method,
            is_deleted: false,
            deleted_at: None,
        });
        metrics::counter!("lodge_payments_recorded_total").increment(1);
        Ok(payment)
    }

    async fn list_users(&self, view: RecordView) -> StoreResult<Vec<User>> {
        Ok(self.state.read().await.users.list(view))
    }

    async fn get_user(&self, id: i64) -> StoreResult<User> {
        self.state.read().await.users.fetch(id, RecordKind::User)
    }

    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let mut state = self.state.write().await;
        ensure_unique_user(&state, &new, None)?;
        ensure_groups_exist(&state, &new.group_ids)?;
        Ok(state.users.insert_with(|id| User {
            id,
            username: new.username,
            lastname: new.lastname,
            email: new.email,
            is_active: new.is_active,
            is_staff: new.is_staff,
            date_joined: Utc::now(),
            group_ids: new.group_ids,
            is_deleted: false,
            deleted_at: None,
        }))
    }

    async fn update_user(&self, id: i64, new: NewUser) -> StoreResult<User> {
        let mut state = self.state.write().await;
        ensure_unique_user(&state, &new, Some(id))?;
        ensure_groups_exist(&state, &new.group_ids)?;
        let user = state
            .users
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound("user".into()))?;
        user.username = new.username;
        user.lastname = new.lastname;
        user.email = new.email;
        user.is_active = new.is_active;
        user.is_staff = new.is_staff;
        user.group_ids = new.group_ids;
        Ok(user.clone())
    }

    async fn list_groups(&self) -> StoreResult<Vec<Group>> {
        Ok(self.state.read().await.groups.values().cloned().collect())
    }

    async fn get_group(&self, id: i64) -> StoreResult<Group> {
        self.state
            .read()
            .await
            .groups
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("group".into()))
    }

    async fn create_group(&self, new: NewGroup) -> StoreResult<Group> {
        let mut state = self.state.write().await;
        if state.groups.values().any(|g| g.name == new.name) {
            return Err(StoreError::Conflict("group name already exists".into()));
        }
        ensure_permissions_exist(&state, &new.permission_ids)?;
        Ok(state.groups.insert_with(|id| Group {
            id,
            name: new.name,
            permission_ids: new.permission_ids,
        }))
    }

    async fn update_group(&self, id: i64, new: NewGroup) -> StoreResult<Group> {
        let mut state = self.state.write().await;
        if state
            .groups
            .values()
            .any(|g| g.name == new.name && g.id != id)
        {
            return Err(StoreError::Conflict("group name already exists".into()));
        }
        ensure_permissions_exist(&state, &new.permission_ids)?;
        let group = state
            .groups
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound("group".into()))?;
        group.name = new.name;
        group.permission_ids = new.permission_ids;
        Ok(group.clone())
    }

    async fn delete_group(&self, id: i64) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.groups.remove(id).is_none() {
            return Err(StoreError::NotFound("group".into()));
        }
        // Drop stale memberships.
        for user in state.users.rows.values_mut() {
            user.group_ids.retain(|g| *g != id);
        }
        Ok(())
    }

    async fn list_permissions(&self) -> StoreResult<Vec<Permission>> {
        Ok(self
            .state
            .read()
            .await
            .permissions
            .values()
            .cloned()
            .collect())
    }

    async fn get_permission(&self, id: i64) -> StoreResult<Permission> {
        self.state
            .read()
            .await
            .permissions
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("permission".into()))
    }

    async fn create_permission(&self, new: NewPermission) -> StoreResult<Permission> {
        let mut state = self.state.write().await;
        if state
            .permissions
            .values()
            .any(|p| p.name == new.name || p.code == new.code)
        {
            return Err(StoreError::Conflict(
                "permission name or code already exists".into(),
            ));
        }
        Ok(state.permissions.insert_with(|id| Permission {
            id,
            name: new.name,
            code: new.code,
        }))
    }

    async fn update_permission(&self, id: i64, new: NewPermission) -> StoreResult<Permission> {
        let mut state = self.state.write().await;
        if state
            .permissions
            .values()
            .any(|p| (p.name == new.name || p.code == new.code) && p.id != id)
        {
            return Err(StoreError::Conflict(
                "permission name or code already exists".into(),
            ));
        }
        let permission = state
            .permissions
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound("permission".into()))?;
        permission.name = new.name;
        permission.code = new.code;
        Ok(permission.clone())
    }

    async fn delete_permission(&self, id: i64) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.permissions.remove(id).is_none() {
            return Err(StoreError::NotFound("permission".into()));
        }
        for group in state.groups.rows.values_mut() {
            group.permission_ids.retain(|p| *p != id);
        }
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

fn validate_stars(stars: i16) -> StoreResult<()> {
    if !(1..=5).contains(&stars) {
        return Err(StoreError::Validation(
            "stars must be between 1 and 5".into(),
        ));
    }
    Ok(())
}

fn ensure_live_hotel(state: &State, hotel_id: i64) -> StoreResult<()> {
    state
        .hotels
        .fetch_live(hotel_id, RecordKind::Hotel)
        .map(|_| ())
        .map_err(|_| StoreError::Validation(format!("hotel {hotel_id} does not exist")))
}

fn ensure_unique_user(state: &State, new: &NewUser, exclude: Option<i64>) -> StoreResult<()> {
    let taken = state.users.values().any(|u| {
        (u.username == new.username || u.email == new.email) && Some(u.id) != exclude
    });
    if taken {
        return Err(StoreError::Conflict(
            "username or email already taken".into(),
        ));
    }
    Ok(())
}

fn ensure_groups_exist(state: &State, group_ids: &[i64]) -> StoreResult<()> {
    for id in group_ids {
        if state.groups.get(*id).is_none() {
            return Err(StoreError::Validation(format!("group {id} does not exist")));
        }
    }
    Ok(())
}

fn ensure_permissions_exist(state: &State, permission_ids: &[i64]) -> StoreResult<()> {
    for id in permission_ids {
        if state.permissions.get(*id).is_none() {
            return Err(StoreError::Validation(format!(
                "permission {id} does not exist"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PaymentMethod;
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    fn new_hotel(name: &str) -> NewHotel {
        NewHotel {
            name: name.to_string(),
            address: "1 Beach Road".into(),
            village: "Vang Vieng".into(),
            district: "Central".into(),
            province: "Vientiane".into(),
            phone: "+856 20 555 0101".into(),
            email: "stay@example.com".into(),
            stars: 4,
            check_in_time: NaiveTime::from_hms_opt(14, 0, 0).expect("time"),
            check_out_time: NaiveTime::from_hms_opt(12, 0, 0).expect("time"),
        }
    }

    fn new_guest(first: &str) -> NewGuest {
        NewGuest {
            first_name: first.to_string(),
            last_name: "Sisavath".into(),
            date_of_birth: date(1990, 5, 12),
            address: "14 River Lane".into(),
            phone: "+856 20 555 0102".into(),
            email: format!("{first}@example.com"),
        }
    }

    fn new_staff(hotel_id: i64) -> NewStaff {
        NewStaff {
            hotel_id,
            first_name: "Noy".into(),
            last_name: "Keo".into(),
            position: "Receptionist".into(),
            salary: Decimal::from(900),
            date_of_birth: date(1995, 1, 20),
            phone: "+856 20 555 0103".into(),
            email: "noy@example.com".into(),
            hire_date: date(2022, 3, 1),
        }
    }

    /// Hotel with one $100/night room and one guest.
    async fn seed(store: &InMemoryStore) -> (Hotel, RoomType, Room, Guest) {
        let hotel = store.create_hotel(new_hotel("Riverside")).await.expect("hotel");
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
        let guest = store.create_guest(new_guest("mala")).await.expect("guest");
        (hotel, room_type, room, guest)
    }

    async fn book(store: &InMemoryStore, guest_id: i64, room_id: i64) -> Booking {
        store
            .create_booking(NewBooking {
                guest_id,
                room_id,
                check_in_date: date(2024, 6, 1),
                check_out_date: Some(date(2024, 6, 4)),
                number_of_days: None,
            })
            .await
            .expect("booking")
    }

    #[tokio::test]
    async fn booking_and_payment_scenario() {
        let store = InMemoryStore::new();
        let (_, _, room, guest) = seed(&store).await;

        let booking = book(&store, guest.id, room.id).await;
        assert_eq!(booking.total_price, Decimal::from(300));
        assert_eq!(booking.number_of_days, 3);
        let room = store.get_room(room.id).await.expect("room");
        assert_eq!(room.status, RoomStatus::Occupied);

        let payment = store
            .create_payment(NewPayment {
                booking_id: booking.id,
                method: PaymentMethod::Cash,
            })
            .await
            .expect("payment");
        assert_eq!(payment.amount, Decimal::from(300));

        // Fully paid: a second payment attempt must fail without recording.
        let err = store
            .create_payment(NewPayment {
                booking_id: booking.id,
                method: PaymentMethod::CreditCard,
            })
            .await
            .expect_err("no outstanding balance");
        assert!(matches!(err, StoreError::NoOutstandingBalance(_)));
        let payments = store
            .list_payments(RecordView::Live, Some(booking.id))
            .await
            .expect("payments");
        assert_eq!(payments.len(), 1);

        store
            .soft_delete(RecordKind::Booking, booking.id, true)
            .await
            .expect("cancel");
        let room = store.get_room(room.id).await.expect("room");
        assert_eq!(room.status, RoomStatus::Available);
    }

    #[tokio::test]
    async fn booking_derives_check_out_from_night_count() {
        let store = InMemoryStore::new();
        let (_, _, room, guest) = seed(&store).await;
        let booking = store
            .create_booking(NewBooking {
                guest_id: guest.id,
                room_id: room.id,
                check_in_date: date(2024, 6, 1),
                check_out_date: None,
                number_of_days: Some(2),
            })
            .await
            .expect("booking");
        assert_eq!(booking.check_out_date, date(2024, 6, 3));
        assert_eq!(booking.total_price, Decimal::from(200));
    }

    #[tokio::test]
    async fn ambiguous_duration_mutates_nothing() {
        let store = InMemoryStore::new();
        let (_, _, room, guest) = seed(&store).await;
        let err = store
            .create_booking(NewBooking {
                guest_id: guest.id,
                room_id: room.id,
                check_in_date: date(2024, 6, 1),
                check_out_date: Some(date(2024, 6, 4)),
                number_of_days: Some(3),
            })
            .await
            .expect_err("ambiguous");
        assert!(matches!(err, StoreError::AmbiguousDuration));
        let room = store.get_room(room.id).await.expect("room");
        assert_eq!(room.status, RoomStatus::Available);
        assert!(store
            .list_bookings(RecordView::All)
            .await
            .expect("bookings")
            .is_empty());
    }

    #[tokio::test]
    async fn occupied_room_rejects_booking_without_mutation() {
        let store = InMemoryStore::new();
        let (_, _, room, guest) = seed(&store).await;
        let first = book(&store, guest.id, room.id).await;
        let other = store.create_guest(new_guest("kham")).await.expect("guest");

        let err = store
            .create_booking(NewBooking {
                guest_id: other.id,
                room_id: room.id,
                check_in_date: date(2024, 7, 1),
                check_out_date: Some(date(2024, 7, 2)),
                number_of_days: None,
            })
            .await
            .expect_err("occupied");
        assert!(matches!(err, StoreError::RoomOccupied(id) if id == room.id));
        let bookings = store.list_bookings(RecordView::All).await.expect("bookings");
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].id, first.id);
    }

    #[tokio::test]
    async fn payments_never_exceed_total_price() {
        let store = InMemoryStore::new();
        let (_, _, room, guest) = seed(&store).await;
        let booking = book(&store, guest.id, room.id).await;

        let mut paid = Decimal::ZERO;
        while let Ok(payment) = store
            .create_payment(NewPayment {
                booking_id: booking.id,
                method: PaymentMethod::BankTransfer,
            })
            .await
        {
            paid += payment.amount;
            assert!(paid <= booking.total_price);
        }
        let balance = store.booking_balance(booking.id).await.expect("balance");
        assert_eq!(balance.total_paid, booking.total_price);
        assert_eq!(balance.outstanding, Decimal::ZERO);
    }

    #[tokio::test]
    async fn soft_deleted_payment_does_not_count_toward_balance() {
        let store = InMemoryStore::new();
        let (_, _, room, guest) = seed(&store).await;
        let booking = book(&store, guest.id, room.id).await;
        let payment = store
            .create_payment(NewPayment {
                booking_id: booking.id,
                method: PaymentMethod::Cash,
            })
            .await
            .expect("payment");
        store
            .soft_delete(RecordKind::Payment, payment.id, true)
            .await
            .expect("delete payment");
        let balance = store.booking_balance(booking.id).await.expect("balance");
        assert_eq!(balance.total_paid, Decimal::ZERO);
        assert_eq!(balance.outstanding, booking.total_price);
    }

    #[tokio::test]
    async fn soft_delete_then_restore_round_trips() {
        let store = InMemoryStore::new();
        let before = store.create_hotel(new_hotel("Plaza")).await.expect("hotel");

        store
            .soft_delete(RecordKind::Hotel, before.id, true)
            .await
            .expect("delete");
        let deleted = store.get_hotel(before.id).await.expect("fallback lookup");
        assert!(deleted.is_deleted);
        assert!(deleted.deleted_at.is_some());
        assert!(store
            .list_hotels(RecordView::Live)
            .await
            .expect("live")
            .is_empty());
        assert_eq!(
            store
                .list_hotels(RecordView::Deleted)
                .await
                .expect("deleted")
                .len(),
            1
        );

        store
            .restore(RecordKind::Hotel, before.id, true)
            .await
            .expect("restore");
        let after = store.get_hotel(before.id).await.expect("hotel");
        assert!(!after.is_deleted);
        assert!(after.deleted_at.is_none());
        assert_eq!(after.name, before.name);
        assert_eq!(after.stars, before.stars);
        assert_eq!(after.check_in_time, before.check_in_time);
    }

    #[tokio::test]
    async fn soft_delete_is_idempotent() {
        let store = InMemoryStore::new();
        let hotel = store.create_hotel(new_hotel("Plaza")).await.expect("hotel");
        store
            .soft_delete(RecordKind::Hotel, hotel.id, true)
            .await
            .expect("first delete");
        store
            .soft_delete(RecordKind::Hotel, hotel.id, true)
            .await
            .expect("second delete is a no-op");
        assert!(store.get_hotel(hotel.id).await.expect("hotel").is_deleted);
    }

    #[tokio::test]
    async fn cascade_covers_transitive_dependents() {
        let store = InMemoryStore::new();
        let (hotel, _, room, guest) = seed(&store).await;
        let staff = store.create_staff(new_staff(hotel.id)).await.expect("staff");
        let booking = book(&store, guest.id, room.id).await;
        let payment = store
            .create_payment(NewPayment {
                booking_id: booking.id,
                method: PaymentMethod::Cash,
            })
            .await
            .expect("payment");

        store
            .soft_delete(RecordKind::Hotel, hotel.id, true)
            .await
            .expect("cascade delete");
        assert!(store.get_staff(staff.id).await.expect("staff").is_deleted);
        assert!(store.get_room(room.id).await.expect("room").is_deleted);
        assert!(store
            .get_booking(booking.id)
            .await
            .expect("booking")
            .is_deleted);
        assert!(store
            .get_payment(payment.id)
            .await
            .expect("payment")
            .is_deleted);
        // The guest is not owned by the hotel.
        assert!(!store.get_guest(guest.id).await.expect("guest").is_deleted);

        store
            .restore(RecordKind::Hotel, hotel.id, true)
            .await
            .expect("cascade restore");
        assert!(!store.get_staff(staff.id).await.expect("staff").is_deleted);
        assert!(!store
            .get_payment(payment.id)
            .await
            .expect("payment")
            .is_deleted);
    }

    #[tokio::test]
    async fn cascade_disabled_touches_only_the_target() {
        let store = InMemoryStore::new();
        let (hotel, _, room, _) = seed(&store).await;
        store
            .soft_delete(RecordKind::Hotel, hotel.id, false)
            .await
            .expect("delete");
        assert!(store.get_hotel(hotel.id).await.expect("hotel").is_deleted);
        assert!(!store.get_room(room.id).await.expect("room").is_deleted);

        store
            .restore(RecordKind::Hotel, hotel.id, false)
            .await
            .expect("restore");
        assert!(!store.get_hotel(hotel.id).await.expect("hotel").is_deleted);
    }

    #[tokio::test]
    async fn hard_delete_is_permanent_and_takes_dependents() {
        let store = InMemoryStore::new();
        let (hotel, _, room, guest) = seed(&store).await;
        let booking = book(&store, guest.id, room.id).await;

        store
            .hard_delete(RecordKind::Hotel, hotel.id)
            .await
            .expect("hard delete");
        assert!(matches!(
            store.get_hotel(hotel.id).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.get_room(room.id).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.get_booking(booking.id).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.restore(RecordKind::Hotel, hotel.id, true).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn hard_deleting_a_booking_releases_the_room() {
        let store = InMemoryStore::new();
        let (_, _, room, guest) = seed(&store).await;
        let booking = book(&store, guest.id, room.id).await;
        store
            .hard_delete(RecordKind::Booking, booking.id)
            .await
            .expect("hard delete");
        let room = store.get_room(room.id).await.expect("room");
        assert_eq!(room.status, RoomStatus::Available);
    }

    #[tokio::test]
    async fn hard_deleting_a_guest_releases_the_booked_room() {
        let store = InMemoryStore::new();
        let (_, _, room, guest) = seed(&store).await;
        book(&store, guest.id, room.id).await;

        // The booking goes as a referential dependent of the guest; its room
        // must not stay occupied with no booking left to release it.
        store
            .hard_delete(RecordKind::Guest, guest.id)
            .await
            .expect("hard delete");
        assert!(store
            .list_bookings(RecordView::All)
            .await
            .expect("bookings")
            .is_empty());
        let room = store.get_room(room.id).await.expect("room");
        assert_eq!(room.status, RoomStatus::Available);
    }

    #[tokio::test]
    async fn redeleting_a_cancelled_booking_leaves_the_rebooked_room_alone() {
        let store = InMemoryStore::new();
        let (_, _, room, guest) = seed(&store).await;
        let cancelled = book(&store, guest.id, room.id).await;
        store
            .soft_delete(RecordKind::Booking, cancelled.id, true)
            .await
            .expect("cancel");

        let other = store.create_guest(new_guest("noy")).await.expect("guest");
        book(&store, other.id, room.id).await;

        // Cascading over the first guest re-deletes the cancelled booking;
        // the room now belongs to the second booking and must stay occupied.
        store
            .soft_delete(RecordKind::Guest, guest.id, true)
            .await
            .expect("delete guest");
        let room = store.get_room(room.id).await.expect("room");
        assert_eq!(room.status, RoomStatus::Occupied);
    }

    #[tokio::test]
    async fn restore_reoccupies_an_available_room() {
        let store = InMemoryStore::new();
        let (_, _, room, guest) = seed(&store).await;
        let booking = book(&store, guest.id, room.id).await;
        store
            .soft_delete(RecordKind::Booking, booking.id, true)
            .await
            .expect("cancel");
        store
            .restore(RecordKind::Booking, booking.id, true)
            .await
            .expect("restore");
        let room = store.get_room(room.id).await.expect("room");
        assert_eq!(room.status, RoomStatus::Occupied);
    }

    #[tokio::test]
    async fn duplicate_room_number_is_scoped_to_the_hotel() {
        let store = InMemoryStore::new();
        let (hotel, room_type, _, _) = seed(&store).await;
        let err = store
            .create_room(NewRoom {
                hotel_id: hotel.id,
                room_type_id: room_type.id,
                room_number: "R101".into(),
            })
            .await
            .expect_err("duplicate");
        assert!(matches!(err, StoreError::Validation(_)));

        // Same number in a different hotel is fine.
        let other = store.create_hotel(new_hotel("Annex")).await.expect("hotel");
        store
            .create_room(NewRoom {
                hotel_id: other.id,
                room_type_id: room_type.id,
                room_number: "R101".into(),
            })
            .await
            .expect("same number, different hotel");
    }

    #[tokio::test]
    async fn sweep_releases_rooms_without_touching_bookings() {
        let store = InMemoryStore::new();
        let (_, _, room, guest) = seed(&store).await;
        let booking = book(&store, guest.id, room.id).await;

        // Reference date before checkout: nothing happens.
        let released = store
            .release_expired_bookings(date(2024, 6, 3))
            .await
            .expect("sweep");
        assert_eq!(released, 0);
        assert_eq!(
            store.get_room(room.id).await.expect("room").status,
            RoomStatus::Occupied
        );

        // Past checkout: the room is released but the booking survives.
        let released = store
            .release_expired_bookings(date(2024, 6, 30))
            .await
            .expect("sweep");
        assert_eq!(released, 1);
        assert_eq!(
            store.get_room(room.id).await.expect("room").status,
            RoomStatus::Available
        );
        let booking = store.get_booking(booking.id).await.expect("booking");
        assert!(!booking.is_deleted);

        // Sweeping again is a no-op.
        let released = store
            .release_expired_bookings(date(2024, 6, 30))
            .await
            .expect("sweep");
        assert_eq!(released, 0);
    }

    #[tokio::test]
    async fn sweep_spares_rooms_rebooked_after_an_old_stay() {
        let store = InMemoryStore::new();
        let (_, _, room, guest) = seed(&store).await;
        book(&store, guest.id, room.id).await;
        let released = store
            .release_expired_bookings(date(2024, 6, 30))
            .await
            .expect("sweep");
        assert_eq!(released, 1);

        // The room is re-booked; the old stay still exists as a live record
        // but must no longer decide the room's fate.
        store
            .create_booking(NewBooking {
                guest_id: guest.id,
                room_id: room.id,
                check_in_date: date(2024, 7, 1),
                check_out_date: Some(date(2024, 7, 10)),
                number_of_days: None,
            })
            .await
            .expect("rebook");
        let released = store
            .release_expired_bookings(date(2024, 7, 5))
            .await
            .expect("sweep");
        assert_eq!(released, 0);
        assert_eq!(
            store.get_room(room.id).await.expect("room").status,
            RoomStatus::Occupied
        );
    }

    #[tokio::test]
    async fn hotel_summary_counts_live_records() {
        let store = InMemoryStore::new();
        let (hotel, _, room, guest) = seed(&store).await;
        let staff = store.create_staff(new_staff(hotel.id)).await.expect("staff");

        let summary = store.hotel_summary(hotel.id).await.expect("summary");
        assert_eq!(summary.available_rooms, 1);
        assert_eq!(summary.staff_count, 1);

        book(&store, guest.id, room.id).await;
        store
            .soft_delete(RecordKind::Staff, staff.id, true)
            .await
            .expect("delete staff");
        let summary = store.hotel_summary(hotel.id).await.expect("summary");
        assert_eq!(summary.available_rooms, 0);
        assert_eq!(summary.staff_count, 0);
    }

    #[tokio::test]
    async fn user_uniqueness_and_group_membership() {
        let store = InMemoryStore::new();
        let permission = store
            .create_permission(NewPermission {
                name: "Manage bookings".into(),
                code: "bookings.manage".into(),
            })
            .await
            .expect("permission");
        let group = store
            .create_group(NewGroup {
                name: "Managers".into(),
                permission_ids: vec![permission.id],
            })
            .await
            .expect("group");
        let user = store
            .create_user(NewUser {
                username: "noy".into(),
                lastname: "Keo".into(),
                email: "noy@example.com".into(),
                is_active: true,
                is_staff: true,
                group_ids: vec![group.id],
            })
            .await
            .expect("user");
        assert_eq!(user.group_ids, vec![group.id]);

        let err = store
            .create_user(NewUser {
                username: "noy".into(),
                lastname: "Other".into(),
                email: "other@example.com".into(),
                is_active: true,
                is_staff: false,
                group_ids: vec![],
            })
            .await
            .expect_err("duplicate username");
        assert!(matches!(err, StoreError::Conflict(_)));

        // Deleting the group strips the membership.
        store.delete_group(group.id).await.expect("delete group");
        let user = store.get_user(user.id).await.expect("user");
        assert!(user.group_ids.is_empty());
    }
}
