mod helpers;
mod signin_test;
