use futures::channel::oneshot;
use volatile_core::AddressableActor;

/// A request waiting in an actor's mailbox, along with where to send the reply
pub(crate) struct ActorTask<A: AddressableActor> {
    pub(crate) request: A::Request,
    pub(crate) reply: oneshot::Sender<A::Reply>,
}

impl<A: AddressableActor> std::fmt::Debug for ActorTask<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorTask")
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}
