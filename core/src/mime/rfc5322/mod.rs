/*
 * mod.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Intestazione, an email header toolkit.
 *
 * Intestazione is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Intestazione is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Intestazione.  If not, see <http://www.gnu.org/licenses/>.
 */

//! RFC 5322 structured values: mailboxes, address lists, message ids, dates.

mod address;
mod address_list;
mod address_parser;
mod date_time;
mod message_id_list;

pub use address::{is_valid_email, Address};
pub use address_list::AddressList;
pub use address_parser::parse_address_list;
pub use date_time::parse_rfc5322_date;
pub use message_id_list::parse_message_id_list;

pub(crate) use address_list::{ascii_email, render_address};
