// SPDX-License-Identifier: MIT

mod engine;
mod error;

pub use engine::{find_route, Route};
pub use error::{RouteError, DEFAULT_STEP_LIMIT};
