mod helpers;

mod directory_test;
mod gate_test;
mod http_test;
mod permission_test;
mod role_test;
