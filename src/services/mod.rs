pub mod iw;
