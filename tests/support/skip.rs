/// Skip a test if live AWS credentials are not configured.
#[macro_export]
macro_rules! skip_without_aws {
    () => {
        for var in ["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY", "AWS_DEFAULT_REGION"] {
            if std::env::var(var).is_err() {
                eprintln!("SKIPPED: {var} not set");
                return;
            }
        }
    };
}
