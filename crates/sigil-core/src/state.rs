// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Per-category loading state.

/// Where a category is in its load lifecycle.
///
/// `Idle → Loading → {Loaded | Failed}`; a new request on a `Failed`
/// category moves it back to `Loading`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadingState {
    /// Nothing has been requested yet.
    #[default]
    Idle,
    /// A fetch-and-combine operation is in flight.
    Loading,
    /// The combined asset is cached.
    Loaded,
    /// The last attempt failed with this message.
    Failed(String),
}

impl LoadingState {
    /// Flattens the state into the snapshot shape UI code polls.
    pub fn status(&self) -> LoadingStatus {
        match self {
            LoadingState::Idle => LoadingStatus::default(),
            LoadingState::Loading => LoadingStatus {
                loading: true,
                ..LoadingStatus::default()
            },
            LoadingState::Loaded => LoadingStatus {
                loaded: true,
                ..LoadingStatus::default()
            },
            LoadingState::Failed(message) => LoadingStatus {
                error: Some(message.clone()),
                ..LoadingStatus::default()
            },
        }
    }
}

/// A synchronous snapshot of a category's loading state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingStatus {
    /// A load is currently in flight.
    pub loading: bool,
    /// The combined asset is cached.
    pub loaded: bool,
    /// Message of the last failed attempt. Cleared as soon as a retry starts.
    pub error: Option<String>,
}
