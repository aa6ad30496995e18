// The inverse of `StorageTask`
#[derive(Debug, Clone)]
pub enum StorageResult {
    Load { value: Option<Vec<u8>> },
    Put,
    Delete,
}
