mod integration;
mod scanning;
