mod check_service;
mod info;
mod network_scan;
mod pages;
