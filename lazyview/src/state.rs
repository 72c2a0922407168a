/// Lifecycle of one cached-fetch resolution.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize` when `T` and `E` do.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FetchState<T, E> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Failed(E),
}

/// The data-free discriminant of a [`FetchState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Failed,
}

impl<T, E> FetchState<T, E> {
    pub fn status(&self) -> FetchStatus {
        match self {
            Self::Idle => FetchStatus::Idle,
            Self::Loading => FetchStatus::Loading,
            Self::Success(_) => FetchStatus::Success,
            Self::Failed(_) => FetchStatus::Failed,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> FetchState<&T, &E> {
        match self {
            Self::Idle => FetchState::Idle,
            Self::Loading => FetchState::Loading,
            Self::Success(data) => FetchState::Success(data),
            Self::Failed(err) => FetchState::Failed(err),
        }
    }
}

impl<T, E> From<Result<T, E>> for FetchState<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(err) => Self::Failed(err),
        }
    }
}
