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

//! Acts as the **[A]gent** for sprite loading.
//!
//! [`LoadCoordinator`] is the public-facing API for requesting a category's
//! sprite and querying its state. It deduplicates concurrent requests, drives
//! the source and combiner lanes, fills the [`SpriteCache`](sigil_data::SpriteCache)
//! and hands finished sprites to the [`SymbolInjector`], the only component
//! that touches the rendering surface.

mod coordinator;
mod injector;
mod metrics;
mod surface;

pub use coordinator::LoadCoordinator;
pub use injector::SymbolInjector;
pub use metrics::SpriteMetrics;
pub use surface::DocumentSurface;
