#[tokio::main]
async fn main() {
    park_security::start_server().await;
}
