use tracing::Instrument;

use crate::{
    SecretId, SecretPayload, SecretRecord, UnixTimestamp,
    actors::{
        ActorResult, AddressableActor, RequestId,
        driver::{Actor, Driver},
    },
    io::{ActorIoResult, ActorIoTask, IoResult, IoTask, StorageError},
};

use super::{
    errors::{ReadError, StoreError},
    run::{SecretInput, actor_run},
};

#[derive(Debug)]
pub enum SecretRequest {
    StoreIfAbsent(SecretRecord),
    ReadAndBurn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretReply {
    Stored(Result<(), StoreError>),
    Read(Result<SecretPayload, ReadError>),
}

impl SecretReply {
    /// The outcome of a `StoreIfAbsent`
    pub fn into_stored(self) -> Result<(), StoreError> {
        match self {
            SecretReply::Stored(result) => result,
            SecretReply::Read(_) => Err(mismatched_reply().into()),
        }
    }

    /// The outcome of a `ReadAndBurn`
    pub fn into_read(self) -> Result<SecretPayload, ReadError> {
        match self {
            SecretReply::Read(result) => result,
            SecretReply::Stored(_) => Err(mismatched_reply().into()),
        }
    }
}

fn mismatched_reply() -> StorageError {
    tracing::error!("secret actor replied to a different kind of request");
    StorageError::new("mismatched secret reply")
}

/// The actor owning the record of a single secret identifier.
pub struct SecretActor {
    driver: Driver<Self>,
}

impl Actor for SecretActor {
    type IoTaskAction = ActorIoTask;
    type IoResult = ActorIoResult;
    type StepResults = ActorResult<SecretReply>;
    type Output = (RequestId, SecretReply);
    type Input = SecretInput;

    fn finish_step(
        outputs: Vec<Self::Output>,
        new_io_tasks: Vec<IoTask<ActorIoTask>>,
    ) -> Self::StepResults {
        ActorResult {
            io_tasks: new_io_tasks,
            replies: outputs,
        }
    }
}

impl SecretActor {
    pub fn new(now: UnixTimestamp, secret_id: SecretId) -> Self {
        let span = tracing::info_span!("secret_actor", %secret_id);
        let driver = Driver::spawn(now, move |args| {
            actor_run(args.now, args.rx_input, args.io, secret_id).instrument(span)
        });
        Self { driver }
    }

    fn input(&mut self, now: UnixTimestamp, input: SecretInput) -> ActorResult<SecretReply> {
        self.driver.handle_input(now, input);
        self.driver.step(now)
    }
}

impl AddressableActor for SecretActor {
    type Request = SecretRequest;
    type Reply = SecretReply;

    fn handle_request(
        &mut self,
        now: UnixTimestamp,
        request_id: RequestId,
        request: SecretRequest,
    ) -> ActorResult<SecretReply> {
        self.input(
            now,
            SecretInput::Request {
                request_id,
                request,
            },
        )
    }

    fn handle_io_complete(
        &mut self,
        now: UnixTimestamp,
        result: IoResult<ActorIoResult>,
    ) -> ActorResult<SecretReply> {
        self.driver.handle_io_complete(now, result);
        self.driver.step(now)
    }

    fn handle_alarm(&mut self, now: UnixTimestamp) -> ActorResult<SecretReply> {
        self.input(now, SecretInput::Alarm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Nonce, secret_record::NONCE_LEN};

    #[test]
    fn replies_unwrap_to_their_own_kind_only() {
        let payload = SecretPayload::new(vec![1, 2], Nonce::from([0; NONCE_LEN]));
        assert_eq!(
            SecretReply::Read(Ok(payload.clone())).into_read(),
            Ok(payload)
        );
        assert_eq!(SecretReply::Stored(Ok(())).into_stored(), Ok(()));

        assert!(matches!(
            SecretReply::Stored(Ok(())).into_read(),
            Err(ReadError::Storage(_))
        ));
        assert!(matches!(
            SecretReply::Read(Err(ReadError::NotFound)).into_stored(),
            Err(StoreError::Storage(_))
        ));
    }
}
