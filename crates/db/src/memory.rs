//! In-process implementation of every repository trait.
//!
//! One [`MemoryStore`] holds all tables behind a single mutex, so each
//! operation is atomic the same way a single SQL statement is. It enforces
//! the same unique indexes, foreign keys and cascades as the migrations.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use staybook_core::roles::Role;
use staybook_core::types::{DbId, Timestamp};

use crate::error::{
    StoreError, StoreResult, CHK_BOOKINGS_MAX_STAY, CHK_BOOKINGS_RANGE, FK_BOOKINGS_HOTEL,
    FK_BOOKINGS_USER, FK_ROOMS_HOTEL, UQ_BOOKINGS_ACTIVE_OWNER_HOTEL, UQ_ROOMS_HOTEL_ROOM_NUMBER,
    UQ_USERS_EMAIL,
};
use crate::models::booking::{
    Booking, BookingDetail, BookingFilter, HotelSummary, NewBooking, StayChange, UserSummary,
};
use crate::models::hotel::{CreateHotel, Hotel, UpdateHotel};
use crate::models::hotel_query::HotelQuery;
use crate::models::room::{CreateRoom, Room, UpdateRoom};
use crate::models::user::{CreateUser, User};
use crate::repositories::{
    BookingRepository, HealthCheckRepository, HotelRepository, RoomRepository, UserRepository,
};

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    last_id: DbId,
    users: BTreeMap<DbId, User>,
    hotels: BTreeMap<DbId, Hotel>,
    rooms: BTreeMap<DbId, Room>,
    bookings: BTreeMap<DbId, Booking>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.last_id += 1;
        self.last_id
    }

    fn active_booking(&self, id: DbId) -> Option<&Booking> {
        self.bookings.get(&id).filter(|b| b.deleted_at.is_none())
    }

    fn detail(&self, booking: &Booking) -> Option<BookingDetail> {
        let hotel = self.hotels.get(&booking.hotel_id)?;
        let user = self.users.get(&booking.user_id)?;
        Some(BookingDetail {
            booking: booking.clone(),
            hotel: HotelSummary {
                id: hotel.id,
                name: hotel.name.clone(),
                address: hotel.address.clone(),
                phone_numbers: hotel.phone_numbers.clone(),
            },
            user: Some(UserSummary {
                id: user.id,
                name: user.name.clone(),
                email: user.email.clone(),
            }),
        })
    }

    fn active_bookings(&self, filter: BookingFilter) -> Vec<&Booking> {
        let mut bookings: Vec<&Booking> = self
            .bookings
            .values()
            .filter(|b| b.deleted_at.is_none())
            .filter(|b| filter.user_id.map_or(true, |u| b.user_id == u))
            .filter(|b| filter.hotel_id.map_or(true, |h| b.hotel_id == h))
            .collect();
        bookings.sort_by_key(|b| (b.check_in, b.id));
        bookings
    }
}

/// The `chk_bookings_range` and `chk_bookings_max_stay` constraints.
fn check_stay(check_in: Timestamp, check_out: Timestamp) -> StoreResult<()> {
    if check_out <= check_in {
        return Err(StoreError::check(CHK_BOOKINGS_RANGE));
    }
    if check_out - check_in > TimeDelta::days(3) {
        return Err(StoreError::check(CHK_BOOKINGS_MAX_STAY));
    }
    Ok(())
}

impl MemoryStore {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl HealthCheckRepository for MemoryStore {
    async fn check(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, input: &CreateUser) -> StoreResult<User> {
        let mut t = self.tables();
        let email = input.email.to_lowercase();
        if t.users.values().any(|u| u.email == email) {
            return Err(StoreError::unique(UQ_USERS_EMAIL));
        }
        let now = Utc::now();
        let user = User {
            id: t.next_id(),
            name: input.name.clone(),
            telephone_number: input.telephone_number.clone(),
            email,
            password_hash: input.password_hash.clone(),
            role: input.role.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.tables().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = email.to_lowercase();
        Ok(self
            .tables()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        Ok(self.tables().users.values().rev().cloned().collect())
    }

    async fn set_role(&self, id: DbId, role: Role) -> StoreResult<Option<User>> {
        let mut t = self.tables();
        Ok(t.users.get_mut(&id).map(|user| {
            user.role = role.as_str().to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

#[async_trait]
impl HotelRepository for MemoryStore {
    async fn create(&self, input: &CreateHotel) -> StoreResult<Hotel> {
        let mut t = self.tables();
        let now = Utc::now();
        let hotel = Hotel {
            id: t.next_id(),
            name: input.name.clone(),
            address: input.address.clone(),
            phone_numbers: input.phone_numbers.clone(),
            created_at: now,
            updated_at: now,
        };
        t.hotels.insert(hotel.id, hotel.clone());
        Ok(hotel)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Hotel>> {
        Ok(self.tables().hotels.get(&id).cloned())
    }

    async fn list(&self, query: &HotelQuery, limit: i64, offset: i64) -> StoreResult<Vec<Hotel>> {
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(0);
        let t = self.tables();
        let mut hotels: Vec<&Hotel> = t.hotels.values().filter(|h| query.matches(h)).collect();
        hotels.sort_by(|a, b| query.compare(a, b));
        Ok(hotels.into_iter().skip(skip).take(take).cloned().collect())
    }

    async fn count(&self, query: &HotelQuery) -> StoreResult<i64> {
        let matching = self
            .tables()
            .hotels
            .values()
            .filter(|h| query.matches(h))
            .count();
        Ok(matching as i64)
    }

    async fn update(&self, id: DbId, input: &UpdateHotel) -> StoreResult<Option<Hotel>> {
        let mut t = self.tables();
        Ok(t.hotels.get_mut(&id).map(|hotel| {
            if let Some(name) = &input.name {
                hotel.name = name.clone();
            }
            if let Some(address) = &input.address {
                hotel.address = address.clone();
            }
            if let Some(phone_numbers) = &input.phone_numbers {
                hotel.phone_numbers = phone_numbers.clone();
            }
            hotel.updated_at = Utc::now();
            hotel.clone()
        }))
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let mut t = self.tables();
        if t.hotels.remove(&id).is_none() {
            return Ok(false);
        }
        t.rooms.retain(|_, r| r.hotel_id != id);
        t.bookings.retain(|_, b| b.hotel_id != id);
        Ok(true)
    }
}

#[async_trait]
impl RoomRepository for MemoryStore {
    async fn create(&self, input: &CreateRoom) -> StoreResult<Room> {
        let mut t = self.tables();
        if !t.hotels.contains_key(&input.hotel_id) {
            return Err(StoreError::foreign_key(FK_ROOMS_HOTEL));
        }
        if t
            .rooms
            .values()
            .any(|r| r.hotel_id == input.hotel_id && r.room_number == input.room_number)
        {
            return Err(StoreError::unique(UQ_ROOMS_HOTEL_ROOM_NUMBER));
        }
        let now = Utc::now();
        let room = Room {
            id: t.next_id(),
            hotel_id: input.hotel_id,
            room_number: input.room_number.clone(),
            room_type: input.room_type.clone(),
            room_size: input.room_size,
            price_per_night: input.price_per_night,
            created_at: now,
            updated_at: now,
        };
        t.rooms.insert(room.id, room.clone());
        Ok(room)
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Room>> {
        Ok(self.tables().rooms.get(&id).cloned())
    }

    async fn list(&self, hotel_id: Option<DbId>) -> StoreResult<Vec<Room>> {
        let mut rooms: Vec<Room> = self
            .tables()
            .rooms
            .values()
            .filter(|r| hotel_id.map_or(true, |h| r.hotel_id == h))
            .cloned()
            .collect();
        rooms.sort_by(|a, b| {
            (a.hotel_id, &a.room_number).cmp(&(b.hotel_id, &b.room_number))
        });
        Ok(rooms)
    }

    async fn update(&self, id: DbId, input: &UpdateRoom) -> StoreResult<Option<Room>> {
        let mut t = self.tables();
        let Some(hotel_id) = t.rooms.get(&id).map(|r| r.hotel_id) else {
            return Ok(None);
        };
        if let Some(number) = &input.room_number {
            if t
                .rooms
                .values()
                .any(|r| r.id != id && r.hotel_id == hotel_id && &r.room_number == number)
            {
                return Err(StoreError::unique(UQ_ROOMS_HOTEL_ROOM_NUMBER));
            }
        }
        Ok(t.rooms.get_mut(&id).map(|room| {
            if let Some(number) = &input.room_number {
                room.room_number = number.clone();
            }
            if let Some(room_type) = &input.room_type {
                room.room_type = Some(room_type.clone());
            }
            if let Some(size) = input.room_size {
                room.room_size = size;
            }
            if let Some(price) = input.price_per_night {
                room.price_per_night = price;
            }
            room.updated_at = Utc::now();
            room.clone()
        }))
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.tables().rooms.remove(&id).is_some())
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn find_active_by_owner_and_hotel(
        &self,
        user_id: DbId,
        hotel_id: DbId,
    ) -> StoreResult<Vec<Booking>> {
        let filter = BookingFilter {
            user_id: Some(user_id),
            hotel_id: Some(hotel_id),
        };
        BookingRepository::list(self, filter).await
    }

    async fn list(&self, filter: BookingFilter) -> StoreResult<Vec<Booking>> {
        let t = self.tables();
        Ok(t.active_bookings(filter).into_iter().cloned().collect())
    }

    async fn list_detailed(&self, filter: BookingFilter) -> StoreResult<Vec<BookingDetail>> {
        let t = self.tables();
        Ok(t
            .active_bookings(filter)
            .into_iter()
            .filter_map(|b| t.detail(b))
            .collect())
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Booking>> {
        Ok(self.tables().active_booking(id).cloned())
    }

    async fn find_detailed(&self, id: DbId) -> StoreResult<Option<BookingDetail>> {
        let t = self.tables();
        Ok(t.active_booking(id).and_then(|b| t.detail(b)))
    }

    async fn create(&self, input: &NewBooking) -> StoreResult<Booking> {
        check_stay(input.check_in, input.check_out)?;
        let mut t = self.tables();
        if !t.users.contains_key(&input.user_id) {
            return Err(StoreError::foreign_key(FK_BOOKINGS_USER));
        }
        if !t.hotels.contains_key(&input.hotel_id) {
            return Err(StoreError::foreign_key(FK_BOOKINGS_HOTEL));
        }
        if t.bookings.values().any(|b| {
            b.deleted_at.is_none() && b.user_id == input.user_id && b.hotel_id == input.hotel_id
        }) {
            return Err(StoreError::unique(UQ_BOOKINGS_ACTIVE_OWNER_HOTEL));
        }
        let now = Utc::now();
        let booking = Booking {
            id: t.next_id(),
            user_id: input.user_id,
            hotel_id: input.hotel_id,
            check_in: input.check_in,
            check_out: input.check_out,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        t.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn update_stay(&self, id: DbId, change: &StayChange) -> StoreResult<Option<Booking>> {
        let mut t = self.tables();
        let Some(booking) = t.bookings.get_mut(&id).filter(|b| b.deleted_at.is_none()) else {
            return Ok(None);
        };
        check_stay(change.check_in, change.check_out)?;
        booking.check_in = change.check_in;
        booking.check_out = change.check_out;
        booking.updated_at = Utc::now();
        Ok(Some(booking.clone()))
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let mut t = self.tables();
        match t.bookings.get_mut(&id).filter(|b| b.deleted_at.is_none()) {
            Some(booking) => {
                booking.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
