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

//! Agents of the sprite subsystem.
//!
//! Agents own the process-lifetime state and make the tactical decisions: when a
//! category must be fetched, which callers share a load, and when symbols reach
//! the rendering surface. The heavy lifting is delegated to `sigil-lanes`.

#![warn(missing_docs)]

pub mod sprite_agent;

pub use sprite_agent::{DocumentSurface, LoadCoordinator, SpriteMetrics, SymbolInjector};
