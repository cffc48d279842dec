mod test_email;

pub use self::test_email::TestEmailResponse;
