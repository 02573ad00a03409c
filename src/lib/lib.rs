pub mod tt_lookup;
