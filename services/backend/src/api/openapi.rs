//! OpenAPI schema aggregation for the hotel-management API.
//!
//! # Purpose
//! Collects all routes and schema types into a single OpenAPI document for
//! docs and client generation.
use crate::api::{
    bookings, groups, guests, hotels, payments, permissions, room_types, rooms, staff, system,
    users,
    types::{
        BookingListResponse, ErrorResponse, GroupListResponse, GuestBookingsResponse,
        GuestListResponse, HealthStatus,
        HotelListResponse, PaymentListResponse, PermissionListResponse, ReleaseExpiredRequest,
        ReleaseExpiredResponse, RoomListResponse, RoomTypeListResponse, StaffListResponse,
        SystemInfo, UserListResponse,
    },
};
use crate::model::{
    Booking, BookingBalance, BookingUpdate, Group, Guest, Hotel, HotelSummary, NewBooking,
    NewGroup, NewGuest, NewHotel, NewPayment, NewPermission, NewRoom, NewRoomType, NewStaff,
    NewUser, Payment, PaymentMethod, Permission, Room, RoomStatus, RoomType, Staff, User,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "lodge-backend",
        version = "v1",
        description = "Hotel management HTTP API"
    ),
    paths(
        system::system_info,
        system::system_health,
        hotels::list_hotels,
        hotels::get_hotel,
        hotels::create_hotel,
        hotels::update_hotel,
        hotels::delete_hotel,
        hotels::restore_hotel,
        hotels::hard_delete_hotel,
        hotels::hotel_summary,
        staff::list_staff,
        staff::get_staff,
        staff::create_staff,
        staff::update_staff,
        staff::delete_staff,
        staff::restore_staff,
        staff::hard_delete_staff,
        guests::list_guests,
        guests::get_guest,
        guests::create_guest,
        guests::update_guest,
        guests::delete_guest,
        guests::restore_guest,
        guests::hard_delete_guest,
        guests::guest_bookings,
        room_types::list_room_types,
        room_types::get_room_type,
        room_types::create_room_type,
        room_types::update_room_type,
        room_types::delete_room_type,
        room_types::restore_room_type,
        room_types::hard_delete_room_type,
        rooms::list_rooms,
        rooms::get_room,
        rooms::create_room,
        rooms::update_room,
        rooms::delete_room,
        rooms::restore_room,
        rooms::hard_delete_room,
        bookings::list_bookings,
        bookings::get_booking,
        bookings::create_booking,
        bookings::update_booking,
        bookings::delete_booking,
        bookings::restore_booking,
        bookings::hard_delete_booking,
        bookings::booking_balance,
        bookings::release_expired,
        payments::list_payments,
        payments::get_payment,
        payments::create_payment,
        payments::delete_payment,
        payments::restore_payment,
        payments::hard_delete_payment,
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        users::restore_user,
        users::hard_delete_user,
        groups::list_groups,
        groups::get_group,
        groups::create_group,
        groups::update_group,
        groups::delete_group,
        permissions::list_permissions,
        permissions::get_permission,
        permissions::create_permission,
        permissions::update_permission,
        permissions::delete_permission
    ),
    components(schemas(
        ErrorResponse,
        SystemInfo,
        HealthStatus,
        Hotel,
        NewHotel,
        HotelSummary,
        HotelListResponse,
        Staff,
        NewStaff,
        StaffListResponse,
        Guest,
        NewGuest,
        GuestListResponse,
        GuestBookingsResponse,
        RoomType,
        NewRoomType,
        RoomTypeListResponse,
        Room,
        NewRoom,
        RoomStatus,
        RoomListResponse,
        Booking,
        NewBooking,
        BookingUpdate,
        BookingBalance,
        BookingListResponse,
        ReleaseExpiredRequest,
        ReleaseExpiredResponse,
        Payment,
        NewPayment,
        PaymentMethod,
        PaymentListResponse,
        User,
        NewUser,
        UserListResponse,
        Group,
        NewGroup,
        GroupListResponse,
        Permission,
        NewPermission,
        PermissionListResponse
    )),
    tags(
        (name = "system", description = "System and health endpoints"),
        (name = "hotels", description = "Hotel management"),
        (name = "staff", description = "Staff management"),
        (name = "guests", description = "Guest management"),
        (name = "room-types", description = "Room type catalogue"),
        (name = "rooms", description = "Room inventory"),
        (name = "bookings", description = "Booking lifecycle"),
        (name = "payments", description = "Payment ledger"),
        (name = "admin", description = "Users, groups, and permissions")
    )
)]
pub struct ApiDoc;
