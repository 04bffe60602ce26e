// Application layer: page call sites built on the bridge and client.

pub mod pages;
