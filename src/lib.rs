//! # git-sort
//!
//! Keeps the sorted section of a kernel patch series (`series.conf`) in the
//! order in which the backported commits appear upstream.
//!
//! ## Quick Example
//!
//! ```
//! use git_sort::config::Remotes;
//! use git_sort::index::{CommitIndex, SortIndex};
//!
//! let remotes = Remotes::parse("remotes:\n  - url: torvalds/linux\n").unwrap();
//! let mut index = SortIndex::new("example");
//! index.add_head(remotes.mainline(), ["1111111111111111111111111111111111111111"]);
//!
//! let found = index.lookup("1111111111111111111111111111111111111111").unwrap();
//! assert_eq!(found.head, *remotes.mainline());
//! assert_eq!(found.ordinal, 0);
//! ```
//!
//! ## Core Concepts
//!
//! - **Heads (`head`, `config`)**: upstream branches, totally ordered by
//!   authority, from the remotes list. The virtual out-of-tree head comes
//!   last.
//! - **Commit index (`index`)**: where each upstream commit lives (head and
//!   ordinal), loaded from a file produced by an external indexer.
//! - **Series (`series`)** and **patches (`patch`)**: the `series.conf`
//!   line model and the tag header of each patch.
//! - **Classification (`classify`)**: decides the destination section of
//!   every patch from its tags and the index.
//! - **Sorting (`sort`)**: groups entries into sections, orders them and
//!   renders the interior.
//! - **Tags (`tags`)**: rewrites `Git-repo`/`Patch-mainline` of patches
//!   that moved.
//! - **Merging (`merge`)**: three-way reconciliation of `series.conf` for
//!   use as a git mergetool.
//! - **Insertion (`insert`)**: where a new commit goes in a sorted series.

pub mod classify;
pub mod config;
pub mod defaults;
pub mod error;
pub mod git;
pub mod head;
pub mod index;
pub mod insert;
pub mod merge;
pub mod ordered_set;
pub mod output;
pub mod patch;
pub mod series;
pub mod sort;
pub mod tags;

#[cfg(test)]
mod sort_proptest;
