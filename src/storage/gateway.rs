use crate::error::AppResult;
use crate::storage::keys::AudioObject;

/// Capability surface over the single bucket a run works against.
pub trait StorageGateway {
    fn bucket(&self) -> &str;

    /// `Ok(false)` when the key is absent; any other failure is an error.
    fn exists(&self, key: &str) -> AppResult<bool>;

    fn copy(&self, source_key: &str, dest_key: &str) -> AppResult<()>;

    fn delete(&self, key: &str) -> AppResult<()>;

    /// At most `max_items` keys under `prefix`, in listing order.
    fn list(&self, prefix: &str, max_items: usize) -> AppResult<Vec<String>>;
}

/// Keys ending with `extension`, exact and case-sensitive, order preserved.
pub fn filter_by_extension(keys: Vec<String>, extension: &str) -> Vec<String> {
    keys.into_iter()
        .filter(|key| AudioObject::new(key.as_str()).has_extension(extension))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::filter_by_extension;

    #[test]
    fn extension_filter_keeps_matching_keys_in_order() {
        let keys = vec!["a.wav".to_owned(), "b.mp3".to_owned(), "c.wav".to_owned()];
        assert_eq!(filter_by_extension(keys, ".wav"), vec!["a.wav", "c.wav"]);
    }

    #[test]
    fn extension_filter_is_case_sensitive() {
        let keys = vec!["a.WAV".to_owned(), "b.wav".to_owned()];
        assert_eq!(filter_by_extension(keys, ".wav"), vec!["b.wav"]);
    }
}
