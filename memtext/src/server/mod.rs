pub mod main;
pub mod memc_tcp;
pub mod timer;
