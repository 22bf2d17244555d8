// Copyright 2025 ScopeDB <contact@scopedb.io>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::process::ExitCode;

use fabo_client::Client;
use tests_toolkit::StubHandle;
use tests_toolkit::StubServer;
use tests_toolkit::TEST_TOKEN;
use tests_toolkit::make_test_name;

pub struct Testkit {
    pub client: Client,
    pub stub: StubHandle,
}

pub fn harness<T, Fut>(test: impl Send + FnOnce(Testkit) -> Fut) -> ExitCode
where
    T: std::process::Termination,
    Fut: Send + Future<Output = T>,
{
    tests_toolkit::init_logging();
    let rt = tokio::runtime::Runtime::new().unwrap();

    let test_name = make_test_name::<Fut>();
    rt.block_on(async move {
        let server = StubServer::start().await.unwrap();
        let stub = server.handle();
        log::info!("running {test_name} against {}", stub.base_url());

        let client = Client::new(TEST_TOKEN, stub.base_url()).unwrap();
        let exit_code = test(Testkit { client, stub }).await.report();

        server.shutdown().await;
        exit_code
    })
}
