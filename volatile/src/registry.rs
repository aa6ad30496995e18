use std::{
    collections::HashMap,
    fmt::Display,
    hash::Hash,
    sync::{Arc, Mutex},
};

use futures::channel::{mpsc, oneshot};
use volatile_core::AddressableActor;

use crate::{Stopped, actor_task::ActorTask};

/// Anything an actor can be addressed by
pub(crate) trait ActorName: Clone + Eq + Hash + Display + Send + Sync + 'static {}

impl<T: Clone + Eq + Hash + Display + Send + Sync + 'static> ActorName for T {}

type Launch<A, K> =
    Box<dyn Fn(&Arc<Registry<A, K>>, K, mpsc::UnboundedReceiver<ActorTask<A>>) + Send + Sync>;

/// Maps actor names to the mailbox of the worker currently running them.
///
/// There is at most one worker per name. A worker is started by the first
/// request for a name with no mailbox and removes its own entry once it has
/// nothing queued and no alarm pending. Both happen under the same lock, so a
/// request either lands in a live worker's queue or starts a new worker.
pub(crate) struct Registry<A: AddressableActor, K> {
    state: Mutex<State<A, K>>,
    launch: Launch<A, K>,
}

struct State<A: AddressableActor, K> {
    mailboxes: HashMap<K, mpsc::UnboundedSender<ActorTask<A>>>,
    live_workers: usize,
    stopped: bool,
    stop_waiters: Vec<oneshot::Sender<()>>,
}

impl<A: AddressableActor, K: ActorName> Registry<A, K> {
    /// `launch` must spawn a worker which drains the receiver it is given
    /// and calls [`worker_finished`](Self::worker_finished) when it exits
    pub(crate) fn new<L>(launch: L) -> Arc<Self>
    where
        L: Fn(&Arc<Self>, K, mpsc::UnboundedReceiver<ActorTask<A>>) + Send + Sync + 'static,
    {
        Arc::new(Self {
            state: Mutex::new(State {
                mailboxes: HashMap::new(),
                live_workers: 0,
                stopped: false,
                stop_waiters: Vec::new(),
            }),
            launch: Box::new(launch),
        })
    }

    /// Queue `request` for the actor called `name`, starting it if necessary
    pub(crate) fn request(
        self: &Arc<Self>,
        name: K,
        request: A::Request,
    ) -> Result<oneshot::Receiver<A::Reply>, Stopped> {
        let (reply, rx) = oneshot::channel();
        let task = ActorTask { request, reply };

        let mut state = self.state.lock().unwrap();
        if state.stopped {
            return Err(Stopped);
        }
        let undelivered = match state.mailboxes.get(&name) {
            Some(mailbox) => mailbox.unbounded_send(task).err().map(|e| e.into_inner()),
            None => Some(task),
        };
        let Some(task) = undelivered else {
            return Ok(rx);
        };

        tracing::trace!(%name, "starting actor worker");
        let (tx, worker_rx) = mpsc::unbounded();
        // The receiver is alive so this cannot fail
        let _ = tx.unbounded_send(task);
        state.mailboxes.insert(name.clone(), tx);
        state.live_workers += 1;
        drop(state);

        (self.launch)(self, name, worker_rx);
        Ok(rx)
    }

    /// Called by an idle worker. Returns the next queued task if one arrived
    /// in the meantime, otherwise unregisters the worker and returns `None`.
    pub(crate) fn try_retire(
        &self,
        name: &K,
        rx: &mut mpsc::UnboundedReceiver<ActorTask<A>>,
    ) -> Option<ActorTask<A>> {
        let mut state = self.state.lock().unwrap();
        match rx.try_next() {
            Ok(Some(task)) => Some(task),
            Ok(None) | Err(_) => {
                tracing::trace!(%name, "retiring idle actor worker");
                state.mailboxes.remove(name);
                None
            }
        }
    }

    pub(crate) fn worker_finished(&self) {
        let mut state = self.state.lock().unwrap();
        state.live_workers -= 1;
        if state.stopped && state.live_workers == 0 {
            for waiter in state.stop_waiters.drain(..) {
                let _ = waiter.send(());
            }
        }
    }

    /// Refuse new requests and wait for every worker to finish what it has queued
    pub(crate) async fn stop(&self) {
        let waiter = {
            let mut state = self.state.lock().unwrap();
            state.stopped = true;
            // Dropping the senders lets each worker drain its queue and exit
            state.mailboxes.clear();
            if state.live_workers == 0 {
                return;
            }
            let (tx, rx) = oneshot::channel();
            state.stop_waiters.push(tx);
            rx
        };
        let _ = waiter.await;
    }
}
