//! ULIDs built from chrono's clock so id minting also works in the browser,
//! where `SystemTime::now` is unavailable.

use ulid::Ulid;

pub fn new_ulid() -> Ulid {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    Ulid::from_parts(millis, rand::random::<u128>())
}

pub fn window_id() -> String {
    format!("win_{}", new_ulid())
}
