mod helpers;
mod mocks;

mod basket;
mod catalog;
mod contacts;
mod orders;
mod upload;
