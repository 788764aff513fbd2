// SPDX-License-Identifier: MPL-2.0
//! Application layer: ports through which the core talks to the
//! surrounding subsystems (database, caches, toolkit, color management).

pub mod port;
