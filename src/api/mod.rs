//! HTTP surface: embedded frontend, credential-hiding proxy, interpretation API

use crate::lotto::NumberSet;
use crate::orchestrator::{Orchestrator, OrchestratorError};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method, StatusCode},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// API state
pub struct ApiState {
    pub orchestrator: Arc<Orchestrator>,
    pub upstream: UpstreamTarget,
    pub client: reqwest::Client,
}

/// Where `/api/generate` forwards to.
#[derive(Clone)]
pub struct UpstreamTarget {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub key_env: String,
}

impl UpstreamTarget {
    /// The key is read per request: a missing key surfaces as an upstream
    /// auth failure rather than a startup crash.
    fn endpoint(&self) -> String {
        let key = std::env::var(&self.key_env).unwrap_or_default();
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, key
        )
    }
}

/// Request to interpret a dream
#[derive(Debug, Deserialize)]
pub struct InterpretRequest {
    pub dream: String,
}

/// Response from an interpretation
#[derive(Debug, Serialize)]
pub struct InterpretResponse {
    pub success: bool,
    pub eastern: Option<String>,
    pub western: Option<String>,
    pub sets: Vec<NumberSet>,
    pub error: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
}

/// Create the API router
pub fn create_router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health_check))
        .route("/api/generate", post(proxy_generate))
        .route("/api/interpret", post(interpret))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.upstream.model.clone(),
    })
}

/// Pass-through proxy to the Gemini API.
///
/// The body is forwarded verbatim with the server-held key attached, and
/// the upstream status and JSON body are mirrored back. Transport failures
/// and unreadable bodies get the same error wrap; no retry, no other
/// validation.
async fn proxy_generate(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let body: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Request body is not JSON");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(proxy_error(&e.to_string())),
            );
        }
    };

    let sent = state
        .client
        .post(state.upstream.endpoint())
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await;

    let response = match sent {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Upstream request failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(proxy_error(&e.to_string())),
            );
        }
    };

    let status = StatusCode::from_u16(response.status().as_u16())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match response.json::<Value>().await {
        Ok(data) => (status, Json(data)),
        Err(e) => {
            error!(error = %e, "Upstream returned a non-JSON body");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(proxy_error(&e.to_string())),
            )
        }
    }
}

fn proxy_error(message: &str) -> Value {
    json!({ "error": "Proxy error", "message": message })
}

/// Interpret a dream server-side
async fn interpret(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<InterpretRequest>,
) -> (StatusCode, Json<InterpretResponse>) {
    match state.orchestrator.interpret(&request.dream).await {
        Ok(interpretation) => (
            StatusCode::OK,
            Json(InterpretResponse {
                success: true,
                eastern: Some(interpretation.eastern),
                western: Some(interpretation.western),
                sets: interpretation.sets,
                error: None,
            }),
        ),
        Err(e) => {
            let status = match &e {
                OrchestratorError::Validation(_) => StatusCode::BAD_REQUEST,
                OrchestratorError::Busy => StatusCode::CONFLICT,
                OrchestratorError::Provider(_) => StatusCode::BAD_GATEWAY,
            };
            warn!(error = %e, "Interpretation failed");
            (
                status,
                Json(InterpretResponse {
                    success: false,
                    eastern: None,
                    western: None,
                    sets: Vec::new(),
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

/// Frontend page
async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}


const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>AI 꿈해몽 - 동양과 서양의 해석, 그리고 행운의 번호</title>
    <style>
        :root {
            --bg: #1a1a2e;
            --card: #16213e;
            --accent: #0f3460;
            --highlight: #e94560;
            --text: #eee;
            --muted: #888;
            --gold: #f5c518;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: 'Apple SD Gothic Neo', 'Noto Sans KR', sans-serif;
            background: var(--bg);
            color: var(--text);
            min-height: 100vh;
            padding: 20px;
        }
        .container { max-width: 720px; margin: 0 auto; }
        h1 {
            font-size: 1.6rem;
            margin: 20px 0;
            color: var(--highlight);
            text-align: center;
        }
        .subtitle {
            text-align: center;
            color: var(--muted);
            margin-bottom: 25px;
            font-size: 0.9rem;
        }
        .card {
            background: var(--card);
            padding: 20px;
            border-radius: 12px;
            margin-bottom: 20px;
        }
        textarea {
            width: 100%;
            height: 120px;
            background: var(--bg);
            border: 1px solid var(--accent);
            border-radius: 8px;
            padding: 12px;
            color: var(--text);
            font-family: inherit;
            font-size: 0.95rem;
            resize: vertical;
        }
        textarea:focus { outline: none; border-color: var(--highlight); }
        button {
            background: var(--highlight);
            color: white;
            border: none;
            padding: 12px 30px;
            border-radius: 8px;
            font-size: 1rem;
            cursor: pointer;
            font-weight: 600;
            width: 100%;
            margin-top: 12px;
        }
        button:hover { opacity: 0.9; }
        button:disabled { opacity: 0.5; cursor: not-allowed; }
        .section-title {
            font-size: 1rem;
            color: var(--highlight);
            margin-bottom: 10px;
        }
        .section-body { line-height: 1.7; white-space: pre-wrap; font-size: 0.95rem; }
        .hidden { display: none; }
        .loading {
            text-align: center;
            color: var(--muted);
            padding: 30px 0;
        }
        .spinner {
            width: 36px;
            height: 36px;
            margin: 0 auto 12px;
            border: 4px solid var(--accent);
            border-top-color: var(--highlight);
            border-radius: 50%;
            animation: spin 0.9s linear infinite;
        }
        @keyframes spin { to { transform: rotate(360deg); } }
        .ad-box {
            text-align: center;
            padding: 20px 0;
            color: var(--muted);
        }
        .ad-bar {
            height: 8px;
            background: var(--accent);
            border-radius: 4px;
            overflow: hidden;
            margin-top: 12px;
        }
        .ad-bar-fill {
            height: 100%;
            width: 0;
            background: var(--gold);
            transition: width linear;
        }
        .lotto-row {
            display: flex;
            gap: 8px;
            justify-content: center;
            margin: 10px 0;
        }
        .set-label {
            text-align: center;
            color: var(--muted);
            font-size: 0.8rem;
            margin-top: 8px;
        }
        .ball {
            width: 40px;
            height: 40px;
            border-radius: 50%;
            display: flex;
            align-items: center;
            justify-content: center;
            font-weight: bold;
            color: #222;
        }
        .ball-yellow { background: #fbc400; }
        .ball-blue { background: #69c8f2; }
        .ball-red { background: #ff7272; }
        .ball-gray { background: #aaa; }
        .ball-green { background: #b0d840; }
    </style>
</head>
<body>
    <div class="container">
        <h1>🌙 AI 꿈해몽</h1>
        <p class="subtitle">간밤의 꿈, 동양과 서양의 시선으로 풀이하고 행운의 번호까지 받아보세요</p>

        <div class="card">
            <textarea id="dream-input" placeholder="꿈 내용을 자세히 적어주세요. (최소 10자)"></textarea>
            <button id="interpret-btn" onclick="interpretDream()">해몽하기</button>
        </div>

        <div id="loading" class="card loading hidden">
            <div class="spinner"></div>
            꿈을 해석하는 중입니다...
        </div>

        <div id="result-section" class="hidden">
            <div class="card">
                <div class="section-title">동양의 해몽</div>
                <div id="eastern-result" class="section-body"></div>
            </div>
            <div class="card">
                <div class="section-title">서양의 해몽</div>
                <div id="western-result" class="section-body"></div>
            </div>

            <div class="card">
                <div class="section-title">🍀 행운의 로또 번호</div>
                <button id="first-reveal-btn" onclick="revealFirst()">광고 보고 3세트 받기</button>
                <div id="first-ad" class="ad-box hidden">
                    광고 시청 중...
                    <div class="ad-bar"><div id="first-ad-fill" class="ad-bar-fill"></div></div>
                </div>
                <div id="first-sets"></div>
                <button id="second-reveal-btn" class="hidden" onclick="revealSecond()">광고 보고 나머지 2세트 받기</button>
                <div id="second-ad" class="ad-box hidden">
                    광고 시청 중...
                    <div class="ad-bar"><div id="second-ad-fill" class="ad-bar-fill"></div></div>
                </div>
                <div id="second-sets"></div>
            </div>
        </div>
    </div>

    <script>
        const AD_SECONDS = 3;
        const FIRST_REVEAL = 3;
        let numberSets = [];

        const el = id => document.getElementById(id);

        function ballClass(n) {
            if (n <= 10) return 'ball-yellow';
            if (n <= 20) return 'ball-blue';
            if (n <= 30) return 'ball-red';
            if (n <= 40) return 'ball-gray';
            return 'ball-green';
        }

        function renderSets(container, sets, offset) {
            container.innerHTML = sets.map((set, i) => `
                <div class="set-label">${offset + i + 1}세트</div>
                <div class="lotto-row">
                    ${set.map(n => `<div class="ball ${ballClass(n)}">${n}</div>`).join('')}
                </div>`).join('');
        }

        function runAd(boxId, fillId) {
            return new Promise(resolve => {
                const box = el(boxId);
                const fill = el(fillId);
                box.classList.remove('hidden');
                fill.style.transitionDuration = AD_SECONDS + 's';
                requestAnimationFrame(() => { fill.style.width = '100%'; });
                setTimeout(() => {
                    box.classList.add('hidden');
                    resolve();
                }, AD_SECONDS * 1000);
            });
        }

        async function interpretDream() {
            const dream = el('dream-input').value.trim();

            if (!dream) {
                alert('꿈 내용을 입력해주세요.');
                return;
            }
            if (dream.length < 10) {
                alert('꿈 내용을 좀 더 자세히 적어주세요. (최소 10자)');
                return;
            }

            const btn = el('interpret-btn');
            btn.disabled = true;
            el('loading').classList.remove('hidden');
            el('result-section').classList.add('hidden');
            el('first-sets').innerHTML = '';
            el('second-sets').innerHTML = '';
            el('first-reveal-btn').classList.remove('hidden');
            el('first-reveal-btn').disabled = false;
            el('second-reveal-btn').classList.add('hidden');

            try {
                const response = await fetch('/api/interpret', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ dream })
                });
                const data = await response.json();

                if (!data.success) {
                    throw new Error(data.error || '해몽 요청 실패');
                }

                el('eastern-result').textContent = data.eastern;
                el('western-result').textContent = data.western;
                numberSets = data.sets;
                el('result-section').classList.remove('hidden');
            } catch (err) {
                console.error('해몽 오류:', err);
                alert('해몽 중 오류가 발생했습니다. 다시 시도해주세요.');
            } finally {
                btn.disabled = false;
                el('loading').classList.add('hidden');
            }
        }

        async function revealFirst() {
            const btn = el('first-reveal-btn');
            btn.disabled = true;
            await runAd('first-ad', 'first-ad-fill');
            btn.classList.add('hidden');
            renderSets(el('first-sets'), numberSets.slice(0, FIRST_REVEAL), 0);
            el('second-reveal-btn').classList.remove('hidden');
            el('second-reveal-btn').disabled = false;
        }

        async function revealSecond() {
            const btn = el('second-reveal-btn');
            btn.disabled = true;
            await runAd('second-ad', 'second-ad-fill');
            btn.classList.add('hidden');
            renderSets(el('second-sets'), numberSets.slice(FIRST_REVEAL), FIRST_REVEAL);
        }
    </script>
</body>
</html>
"##;
