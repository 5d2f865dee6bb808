//! End-to-end tests at the shell command level.
//!
//! Each test file covers a specific scenario, feeding command lines to a
//! fresh session and checking the outcomes and the resulting tree.

#![cfg(test)]

mod helpers;

mod test_duplicate_names;
mod test_files;
mod test_image_round_trip;
mod test_listing_order;
mod test_many_entries;
mod test_navigation;
mod test_nested_removal;
