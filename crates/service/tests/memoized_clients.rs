//! Kept in its own test binary: it sets process env, and nothing else here
//! runs concurrently with it.

use std::sync::Arc;

use service::supabase::{self, AuthOptions};

#[test]
fn server_and_public_clients_are_memoized() {
    std::env::set_var("NEXT_PUBLIC_SUPABASE_URL", "https://abc.supabase.co");
    std::env::set_var("NEXT_PUBLIC_SUPABASE_ANON_KEY", "anon-key");
    std::env::set_var("SUPABASE_SERVICE_ROLE_KEY", "service-key");

    let a = supabase::get_server_client().expect("server client");
    let b = supabase::get_server_client().expect("server client");
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.auth_options(), AuthOptions::SERVER);

    let p1 = supabase::public_client().expect("public client");
    let p2 = supabase::public_client().expect("public client");
    assert!(Arc::ptr_eq(&p1, &p2));
    assert!(!Arc::ptr_eq(&a, &p1));
}
