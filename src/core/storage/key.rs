use once_cell::sync::Lazy;
use regex::Regex;
use time::OffsetDateTime;

/// User id used when the caller sends none.
pub const DEFAULT_USER_ID: &str = "anonimo";

/// Prefix of every audio object.
pub const AUDIO_KEY_PREFIX: &str = "audios";

static DISALLOWED_USER_ID_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.@-]").expect("user id pattern is valid"));

/// Replace every character outside `[A-Za-z0-9_.@-]` with `_`.
///
/// Each disallowed character (not byte) becomes exactly one underscore.
pub fn sanitize_user_id(user_id: &str) -> String {
    DISALLOWED_USER_ID_CHARS
        .replace_all(user_id, "_")
        .into_owned()
}

/// Object key `audios/YYYY/MM/DD/<sanitizedUserId>_<epochMillis>.<ext>`.
///
/// Date parts come from `now` in UTC. Uniqueness rests on millisecond resolution
/// per user id; no random suffix is added.
pub fn build_object_key(user_id: &str, extension: &str, now: OffsetDateTime) -> String {
    let now = now.to_offset(time::UtcOffset::UTC);
    let millis = now.unix_timestamp_nanos() / 1_000_000;
    format!(
        "{AUDIO_KEY_PREFIX}/{:04}/{:02}/{:02}/{}_{}.{}",
        now.year(),
        u8::from(now.month()),
        now.day(),
        sanitize_user_id(user_id),
        millis,
        extension.trim_start_matches('.'),
    )
}

/// Join a public base URL and an object key with exactly one slash.
pub fn public_url(base_url: &str, key: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        key.trim_start_matches('/')
    )
}
