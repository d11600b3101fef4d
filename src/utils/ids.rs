use rand::Rng;

/// URL-safe alphabet, the same 64 symbols nanoid uses.
pub const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Random identifier of `len` URL-safe characters.
pub fn short_id(len: usize) -> String {
    short_id_with(&mut rand::rng(), len)
}

pub fn short_id_with<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Whether `id` could have been produced by [`short_id`]. Used to reject
/// junk before touching the store.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| ALPHABET.contains(&b))
}
