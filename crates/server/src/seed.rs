//! First-boot account seeding.
//!
//! Users are created out-of-band; the demo deployment ships one admin and
//! three participants. Seeding is idempotent across restarts (the store
//! skips usernames that already exist).

use tombola_store::SeedUser;
use tombola_types::UserType;

/// The demo accounts. Passwords equal the username; this is the
/// documented demo credential scheme, not an authentication design.
#[must_use]
pub fn demo_users() -> Vec<SeedUser> {
    [
        ("admin", "Admin User", UserType::Admin),
        ("participant1", "John Doe", UserType::Participant),
        ("participant2", "Jane Smith", UserType::Participant),
        ("participant3", "Bob Johnson", UserType::Participant),
    ]
    .into_iter()
    .map(|(username, name, user_type)| SeedUser {
        username: username.to_string(),
        name: name.to_string(),
        user_type,
        password: username.to_string(),
    })
    .collect()
}
