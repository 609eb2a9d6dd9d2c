mod common;
mod mao;
mod service;
