//! Domain model module.
//!
//! # Purpose
//! Re-exports the hotel-management records, the soft-delete record contract,
//! and the admin (user/group/permission) records used by the API and store
//! layers.
mod booking;
mod guest;
mod hotel;
mod payment;
mod record;
mod room;
mod staff;
mod user;

pub use booking::{
    Booking, BookingBalance, BookingUpdate, NewBooking, StayDates, StayDatesError,
};
pub use guest::{Guest, NewGuest};
pub use hotel::{Hotel, HotelSummary, NewHotel};
pub use payment::{NewPayment, Payment, PaymentMethod};
pub use record::{Deletable, RecordKind, RecordView};
pub use room::{NewRoom, NewRoomType, Room, RoomStatus, RoomType};
pub use staff::{NewStaff, Staff};
pub use user::{Group, NewGroup, NewPermission, NewUser, Permission, User};
