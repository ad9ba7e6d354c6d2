// simlang: performance-simulation engine core.
//
// Copyright (C) 2019  Brandon Lewis
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU Lesser General Public License
// as published by the Free Software Foundation, either version 3 of
// the License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public
// License along with this program.  If not, see
// <https://www.gnu.org/licenses/>.

//! Core of the performance-simulation engine:
//! the probabilistic outcome algebra, the description-language front end
//! (lexer, parser, loader, type inference), the analytic queueing models,
//! and the storage/index cost models. The CLI, network serving layer,
//! filesystem adapters, telemetry, and LLM tooling are external
//! collaborators and live outside this crate.

pub mod ast;
pub mod config;
pub mod cost;
pub mod distribution;
pub mod duration;
pub mod env;
pub mod error;
pub mod inference;
pub mod lexer;
pub mod loader;
pub mod metrics;
pub mod outcome;
pub mod parser;
pub mod pool;
pub mod precedence;
pub mod queueing;
pub mod reduction;
pub mod rng;
pub mod types;
