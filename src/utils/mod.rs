pub mod scope_utils;
