pub mod admindtos;
pub mod referraldtos;
pub mod userdtos;
pub mod withdrawdtos;
