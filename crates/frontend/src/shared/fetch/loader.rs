//! Loaders own the lifecycle of one fetch target: a single record or a page
//! of records.
//!
//! Every request started with [`Loader::begin`] gets a [`RequestTicket`]
//! carrying a generation number. Only the ticket of the latest request can
//! resolve the loader; completions of superseded requests are dropped, so a
//! stale response never reaches `stream` or `ready`.

use std::cell::RefCell;
use std::rc::Rc;

use contracts::shared::pagination::Page;

use super::subscription::EventStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Ошибка загрузки, как её видит UI
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LoadError {
    /// HTTP status, if the server answered
    pub status: Option<u16>,
    pub message: String,
}

impl LoadError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

/// Snapshot of a loader
#[derive(Debug, Clone, PartialEq)]
pub struct LoadResult<T> {
    pub status: LoadStatus,
    pub data: Option<T>,
    pub error: Option<LoadError>,
}

impl<T> Default for LoadResult<T> {
    fn default() -> Self {
        Self {
            status: LoadStatus::Idle,
            data: None,
            error: None,
        }
    }
}

impl<T> LoadResult<T> {
    pub fn loaded(&self) -> bool {
        self.status == LoadStatus::Ready
    }

    pub fn loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
}

struct LoaderState<T> {
    result: LoadResult<T>,
    generation: u64,
    completed: bool,
}

/// Shared handle to a fetch target; clones refer to the same loader.
pub struct Loader<T> {
    state: Rc<RefCell<LoaderState<T>>>,
    ready: EventStream<T>,
    stream: EventStream<LoadResult<T>>,
}

impl<T> Clone for Loader<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            ready: self.ready.clone(),
            stream: self.stream.clone(),
        }
    }
}

pub type ModelLoader<T> = Loader<T>;
pub type ModelListLoader<T> = Loader<Page<T>>;

impl<T: Clone + 'static> Default for Loader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Loader<T> {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(LoaderState {
                result: LoadResult::default(),
                generation: 0,
                completed: false,
            })),
            ready: EventStream::new(),
            stream: EventStream::new(),
        }
    }

    /// Fires with the payload after each successful, current request.
    pub fn ready(&self) -> &EventStream<T> {
        &self.ready
    }

    /// Every state change: loading, ready, failed.
    pub fn stream(&self) -> &EventStream<LoadResult<T>> {
        &self.stream
    }

    pub fn result(&self) -> LoadResult<T> {
        self.state.borrow().result.clone()
    }

    pub fn data(&self) -> Option<T> {
        self.state.borrow().result.data.clone()
    }

    pub fn with_data<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(self.state.borrow().result.data.as_ref())
    }

    pub fn status(&self) -> LoadStatus {
        self.state.borrow().result.status
    }

    pub fn is_completed(&self) -> bool {
        self.state.borrow().completed
    }

    /// Starts a new request, superseding any in flight.
    ///
    /// Clears the previous payload. Returns `None` once the loader is completed.
    pub fn begin(&self) -> Option<RequestTicket> {
        let (ticket, snapshot) = {
            let mut state = self.state.borrow_mut();
            if state.completed {
                return None;
            }
            state.generation += 1;
            state.result = LoadResult {
                status: LoadStatus::Loading,
                data: None,
                error: None,
            };
            (
                RequestTicket {
                    generation: state.generation,
                },
                state.result.clone(),
            )
        };
        self.stream.emit(&snapshot);
        Some(ticket)
    }

    /// Applies the outcome of the request `ticket` was issued for.
    ///
    /// Returns `false` when the ticket is stale or the loader is completed.
    pub fn resolve(&self, ticket: RequestTicket, outcome: Result<T, LoadError>) -> bool {
        let (snapshot, payload) = {
            let mut state = self.state.borrow_mut();
            if state.completed || ticket.generation != state.generation {
                log::debug!(
                    "discarding response of request #{} (current #{})",
                    ticket.generation,
                    state.generation
                );
                return false;
            }
            let payload = outcome.as_ref().ok().cloned();
            state.result = match outcome {
                Ok(data) => LoadResult {
                    status: LoadStatus::Ready,
                    data: Some(data),
                    error: None,
                },
                Err(error) => LoadResult {
                    status: LoadStatus::Failed,
                    data: None,
                    error: Some(error),
                },
            };
            (state.result.clone(), payload)
        };
        self.stream.emit(&snapshot);
        if let Some(data) = payload {
            self.ready.emit(&data);
        }
        true
    }

    /// Stops the loader: listeners are released and later responses ignored.
    pub fn complete(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.completed {
                return;
            }
            state.completed = true;
            state.generation += 1;
        }
        self.ready.clear();
        self.stream.clear();
    }
}
