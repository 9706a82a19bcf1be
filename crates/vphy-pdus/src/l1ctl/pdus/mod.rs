pub mod ccch_mode_req;
pub mod dm_est_req;
pub mod pm_req;
pub mod rach_req;
pub mod reset_req;
