//! Domain factories for creating value objects.

use super::ClientId;

/// Factory for generating ClientId instances.
///
/// Every call yields a fresh random identity.
pub struct ClientIdFactory;

impl ClientIdFactory {
    /// Generate a new ClientId backed by a random UUID v4.
    pub fn generate() -> ClientId {
        ClientId::from_uuid(uuid::Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_factory_generate() {
        // テスト項目: ClientIdFactory::generate() で UUID v4 形式の ClientId を生成できる
        // when (操作):
        let client_id = ClientIdFactory::generate();

        // then (期待する結果):
        assert_eq!(client_id.to_string().len(), 36); // UUID v4 の標準長（ハイフン含む）
        assert_eq!(client_id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn test_client_id_factory_generate_uniqueness() {
        // テスト項目: ClientIdFactory::generate() は毎回異なる ID を生成する
        // when (操作):
        let first = ClientIdFactory::generate();
        let second = ClientIdFactory::generate();

        // then (期待する結果):
        assert_ne!(first, second);
    }
}
