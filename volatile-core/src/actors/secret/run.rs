use std::sync::{Arc, Mutex};

use futures::{StreamExt, channel::mpsc};

use crate::{
    SecretId, SecretPayload, SecretRecord, StorageKey, UnixTimestamp,
    actors::{RequestId, driver::ActorIo, io_access::IoAccess},
    io::StorageError,
};

use super::{
    SecretActor,
    actor::{SecretReply, SecretRequest},
    errors::{ReadError, StoreError},
};

#[derive(Debug)]
pub(crate) enum SecretInput {
    Request {
        request_id: RequestId,
        request: SecretRequest,
    },
    Alarm,
}

/// The run loop of a secret actor.
///
/// Inputs are awaited one after another, so a request's storage reads and
/// writes can never interleave with those of another request.
pub(super) async fn actor_run(
    now: Arc<Mutex<UnixTimestamp>>,
    mut rx_input: mpsc::UnboundedReceiver<SecretInput>,
    io: ActorIo<SecretActor>,
    secret_id: SecretId,
) {
    let io = IoAccess::new(io);
    let key = StorageKey::secret_record_path(&secret_id);
    while let Some(input) = rx_input.next().await {
        let current = *now.lock().unwrap();
        match input {
            SecretInput::Request {
                request_id,
                request: SecretRequest::StoreIfAbsent(record),
            } => {
                let result = store_if_absent(&io, key.clone(), record).await;
                io.emit((request_id, SecretReply::Stored(result)));
            }
            SecretInput::Request {
                request_id,
                request: SecretRequest::ReadAndBurn,
            } => {
                let result = read_and_burn(&io, key.clone(), current).await;
                io.emit((request_id, SecretReply::Read(result)));
            }
            SecretInput::Alarm => expire(&io, key.clone()).await,
        }
    }
}

async fn store_if_absent(
    io: &IoAccess<SecretActor>,
    key: StorageKey,
    record: SecretRecord,
) -> Result<(), StoreError> {
    if io.load(key.clone()).await?.is_some() {
        tracing::warn!("secret id already occupied");
        return Err(StoreError::Collision);
    }
    io.put(key, record.encode(), None).await?;
    io.set_alarm(record.expires_at).await;
    tracing::debug!(expires_at = %record.expires_at, "secret stored");
    Ok(())
}

async fn read_and_burn(
    io: &IoAccess<SecretActor>,
    key: StorageKey,
    now: UnixTimestamp,
) -> Result<SecretPayload, ReadError> {
    let Some(bytes) = io.load(key.clone()).await? else {
        tracing::debug!("no secret to read");
        return Err(ReadError::NotFound);
    };
    let record = match SecretRecord::decode(&bytes) {
        Ok(record) => record,
        Err(e) => {
            tracing::error!(err=%e, "stored secret is unreadable, discarding it");
            io.delete(key).await?;
            return Err(ReadError::Storage(StorageError::new(format!(
                "corrupt secret record: {e}"
            ))));
        }
    };
    if record.is_expired(now) {
        io.delete(key).await?;
        tracing::debug!(expires_at = %record.expires_at, "secret expired before it was read");
        return Err(ReadError::Expired);
    }
    io.delete(key).await?;
    io.cancel_alarm().await;
    tracing::debug!("secret burned");
    Ok(record.payload)
}

async fn expire(io: &IoAccess<SecretActor>, key: StorageKey) {
    match io.delete(key).await {
        Ok(()) => tracing::debug!("expiry alarm fired, secret removed"),
        Err(e) => tracing::error!(err=%e, "failed to remove secret on expiry"),
    }
}
