//! Embedded HTML/CSS/JS frontend for the campaign dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en" class="light">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Campaign Insights</title>
<style>
:root {
  --bg: #f9fafb;
  --surface: #ffffff;
  --border: #e5e7eb;
  --text: #111827;
  --text-muted: #6b7280;
  --accent: #2563eb;
  --green: #16a34a;
  --yellow: #ca8a04;
  --red: #dc2626;
  --purple: #9333ea;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}
html.dark { --border: #374151; }

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
  transition: background 0.2s, color 0.2s;
}

/* Layout */
.app { max-width: 1280px; margin: 0 auto; padding: 24px; }

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 24px; font-weight: 600; }
header .subtitle { color: var(--text-muted); font-size: 13px; }
.header-right { display: flex; gap: 8px; align-items: center; }

.badge {
  display: inline-flex;
  align-items: center;
  gap: 4px;
  padding: 4px 10px;
  border-radius: 12px;
  font-size: 12px;
  font-weight: 500;
  background: var(--surface);
  border: 1px solid var(--border);
}
.badge.ok { border-color: var(--green); color: var(--green); }
.badge.warn { border-color: var(--yellow); color: var(--yellow); }
.badge.err { border-color: var(--red); color: var(--red); }

/* Navigation */
nav {
  display: flex;
  gap: 4px;
  margin-bottom: 24px;
  background: var(--surface);
  border-radius: var(--radius);
  padding: 4px;
  border: 1px solid var(--border);
}
nav button {
  flex: 1;
  padding: 8px 16px;
  border: none;
  border-radius: 6px;
  background: transparent;
  color: var(--text-muted);
  font-size: 13px;
  font-weight: 500;
  cursor: pointer;
}
nav button:hover { color: var(--text); }
nav button.active { background: var(--accent); color: #fff; }

/* Cards */
.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 16px;
}
.card h2 { font-size: 16px; font-weight: 600; margin-bottom: 16px; }
.card-head { display: flex; justify-content: space-between; align-items: center; margin-bottom: 16px; }
.card-head h2 { margin-bottom: 0; }
.grid-2 { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }

/* KPI cards */
.stats-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
  gap: 16px;
  margin-bottom: 24px;
}
.stat-card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
}
.stat-card .label { font-size: 12px; color: var(--text-muted); text-transform: uppercase; letter-spacing: 0.5px; }
.stat-card .value { font-size: 28px; font-weight: 700; font-family: var(--mono); margin-top: 4px; }
.stat-card .change { font-size: 12px; margin-top: 4px; }
.up { color: var(--green); }
.down { color: var(--red); }
.flat { color: var(--text-muted); }

/* Filters */
.filters { display: flex; flex-wrap: wrap; gap: 8px; margin-bottom: 12px; align-items: center; }
.filters input[type="search"], .filters input[type="date"] {
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: 6px;
  color: var(--text);
  padding: 6px 10px;
  font-size: 13px;
}
.filters input[type="search"] { width: 240px; }
.dropdown { position: relative; }
.dropdown .menu {
  display: none;
  position: absolute;
  top: calc(100% + 4px);
  left: 0;
  min-width: 200px;
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: 6px;
  padding: 6px;
  z-index: 10;
}
.dropdown.open .menu { display: block; }
.dropdown .menu label { display: flex; gap: 8px; padding: 4px 6px; cursor: pointer; font-size: 13px; }
.dropdown .menu label .count { margin-left: auto; color: var(--text-muted); }
.filter-count {
  background: var(--accent);
  color: #fff;
  border-radius: 10px;
  padding: 0 6px;
  font-size: 11px;
}

/* Tables */
table { width: 100%; border-collapse: collapse; font-size: 13px; }
th, td { text-align: left; padding: 8px 10px; border-bottom: 1px solid var(--border); white-space: nowrap; }
th { color: var(--text-muted); font-weight: 500; font-size: 12px; text-transform: uppercase; cursor: pointer; user-select: none; }
th.sorted { color: var(--accent); }
td.num, th.num { text-align: right; font-family: var(--mono); }
.table-wrap { overflow-x: auto; }
.status { padding: 2px 8px; border-radius: 10px; font-size: 11px; font-weight: 600; }
.status.active { background: rgba(22,163,74,0.12); color: var(--green); }
.status.paused { background: rgba(202,138,4,0.12); color: var(--yellow); }
.status.completed { background: rgba(37,99,235,0.12); color: var(--accent); }
.pager { display: flex; justify-content: space-between; align-items: center; margin-top: 12px; color: var(--text-muted); font-size: 12px; }
.pager .btn-group { margin-top: 0; }

/* Widgets */
.list-item { padding: 10px 0; border-bottom: 1px solid var(--border); }
.list-item:last-child { border-bottom: none; }
.list-item .title { font-weight: 600; display: flex; gap: 8px; align-items: center; }
.list-item .meta { color: var(--text-muted); font-size: 12px; }
.pill { font-size: 11px; padding: 1px 8px; border-radius: 10px; border: 1px solid var(--border); color: var(--text-muted); }
.pill.high { border-color: var(--red); color: var(--red); }
.pill.medium { border-color: var(--yellow); color: var(--yellow); }
.pill.low { border-color: var(--green); color: var(--green); }
.pill.applied, .pill.resolved, .pill.positive { border-color: var(--green); color: var(--green); }
.pill.rejected { color: var(--text-muted); }
.pill.negative { border-color: var(--red); color: var(--red); }

.chart { display: flex; align-items: flex-end; gap: 4px; height: 120px; margin-top: 12px; }
.chart .bar { flex: 1; background: var(--accent); border-radius: 3px 3px 0 0; min-height: 2px; position: relative; }
.chart .bar.predicted { background: var(--purple); opacity: 0.7; }
.chart .bar.flagged { background: var(--red); }
.chart-labels { display: flex; gap: 4px; font-size: 10px; color: var(--text-muted); }
.chart-labels span { flex: 1; text-align: center; }

.sentiment-bar { display: flex; height: 16px; border-radius: 6px; overflow: hidden; margin: 8px 0; }
.sentiment-bar div { height: 100%; }
.sentiment-bar .positive { background: var(--green); }
.sentiment-bar .neutral { background: var(--yellow); }
.sentiment-bar .negative { background: var(--red); }

/* Chat */
.chat-log { height: 360px; overflow-y: auto; display: flex; flex-direction: column; gap: 10px; padding: 4px; }
.msg { max-width: 80%; padding: 10px 14px; border-radius: 12px; white-space: pre-wrap; }
.msg.user { align-self: flex-end; background: var(--accent); color: #fff; }
.msg.assistant { align-self: flex-start; background: var(--bg); border: 1px solid var(--border); }
.msg .data { display: flex; flex-wrap: wrap; gap: 8px; margin-top: 8px; }
.msg .data span { font-family: var(--mono); font-size: 12px; padding: 2px 8px; border-radius: 6px; background: var(--surface); border: 1px solid var(--border); }
.suggestions { display: flex; flex-wrap: wrap; gap: 6px; margin-top: 8px; }
.chat-input { display: flex; gap: 8px; margin-top: 12px; }
.chat-input input { flex: 1; background: var(--bg); border: 1px solid var(--border); border-radius: 6px; color: var(--text); padding: 8px 10px; }
.thinking { color: var(--text-muted); font-style: italic; }

/* Config page */
.config-row { display: flex; align-items: center; padding: 8px 0; gap: 12px; }
.config-row label { flex: 0 0 240px; font-size: 13px; }
.config-row input, .config-row select {
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: 6px;
  color: var(--text);
  padding: 6px 10px;
  font-size: 13px;
  font-family: var(--mono);
  width: 220px;
}
pre.toml { font-family: var(--mono); font-size: 12px; background: var(--bg); padding: 12px; border-radius: 6px; overflow-x: auto; }

/* Buttons */
.btn {
  display: inline-flex;
  align-items: center;
  gap: 6px;
  padding: 6px 12px;
  border: 1px solid var(--border);
  border-radius: 6px;
  background: var(--surface);
  color: var(--text);
  font-size: 13px;
  cursor: pointer;
}
.btn:hover { border-color: var(--accent); color: var(--accent); }
.btn:disabled { opacity: 0.4; cursor: default; }
.btn.small { padding: 2px 8px; font-size: 12px; }
.btn.primary { background: var(--accent); color: #fff; border-color: var(--accent); }
.btn.danger { border-color: var(--red); color: var(--red); }
.btn-group { display: flex; gap: 8px; margin-top: 16px; }

/* Toast notification */
.toast {
  position: fixed;
  bottom: 24px;
  right: 24px;
  padding: 12px 20px;
  border-radius: var(--radius);
  background: var(--green);
  color: #fff;
  font-weight: 500;
  font-size: 13px;
  transform: translateY(80px);
  opacity: 0;
  transition: all 0.3s;
  z-index: 1000;
}
.toast.show { transform: translateY(0); opacity: 1; }
.toast.error { background: var(--red); }

.panel { display: none; }
.panel.active { display: block; }
.empty { text-align: center; padding: 32px 20px; color: var(--text-muted); }

@media (max-width: 900px) {
  .grid-2 { grid-template-columns: 1fr; }
  .stats-grid { grid-template-columns: repeat(2, 1fr); }
  nav { flex-wrap: wrap; }
}
</style>
</head>
<body>
<div class="app">

  <!-- Header -->
  <header>
    <div>
      <h1 id="title">Campaign Performance</h1>
      <div class="subtitle">Brand insights dashboard</div>
    </div>
    <div class="header-right">
      <div id="health-badges"></div>
      <button class="btn" id="btn-theme" title="Toggle theme">Dark mode</button>
    </div>
  </header>

  <!-- KPI cards -->
  <div class="stats-grid" id="stats-grid"></div>

  <nav id="nav">
    <button class="active" data-panel="campaigns">Campaigns</button>
    <button data-panel="insights">Insights</button>
    <button data-panel="chat">Assistant</button>
    <button data-panel="config">Configuration</button>
  </nav>

  <!-- Campaigns -->
  <div class="panel active" id="panel-campaigns">
    <div class="card">
      <div class="filters">
        <input type="search" id="f-search" placeholder="Search campaigns…">
        <div class="dropdown" id="dd-status">
          <button class="btn" data-toggle="dd-status"><span id="lbl-status">All Status</span></button>
          <div class="menu" id="menu-status"></div>
        </div>
        <div class="dropdown" id="dd-platform">
          <button class="btn" data-toggle="dd-platform"><span id="lbl-platform">All Platforms</span></button>
          <div class="menu" id="menu-platform"></div>
        </div>
        <input type="date" id="f-from" title="Start date from">
        <input type="date" id="f-to" title="Start date to">
        <button class="btn" id="btn-clear">Clear <span class="filter-count" id="filter-count" style="display:none"></span></button>
        <span style="flex:1"></span>
        <button class="btn primary" id="btn-export">Export CSV</button>
      </div>
      <div class="table-wrap">
        <table>
          <thead><tr id="campaigns-head"></tr></thead>
          <tbody id="campaigns-body"></tbody>
        </table>
      </div>
      <div class="empty" id="campaigns-empty" style="display:none">No campaigns match the current filters.</div>
      <div class="pager">
        <span id="page-summary"></span>
        <div class="btn-group">
          <button class="btn small" id="btn-prev">Previous</button>
          <span id="page-label"></span>
          <button class="btn small" id="btn-next">Next</button>
        </div>
      </div>
    </div>
  </div>

  <!-- Insights -->
  <div class="panel" id="panel-insights">
    <div class="grid-2">
      <div class="card">
        <h2>AI Predictions</h2>
        <div id="predictions"></div>
        <div class="chart" id="forecast-chart"></div>
        <div class="chart-labels" id="forecast-labels"></div>
      </div>
      <div class="card">
        <h2>Customer Sentiment</h2>
        <div id="sentiment"></div>
      </div>
      <div class="card">
        <div class="card-head">
          <h2>Anomaly Detection</h2>
          <button class="btn small" id="btn-monitoring">Pause</button>
        </div>
        <div id="anomaly-stats" class="meta"></div>
        <div class="chart" id="anomaly-chart"></div>
        <div id="anomalies"></div>
      </div>
      <div class="card">
        <div class="card-head">
          <h2>Auto Optimizer</h2>
          <button class="btn small" id="btn-auto">Auto: off</button>
        </div>
        <div id="optimizer-stats" class="meta"></div>
        <div id="optimizations"></div>
      </div>
    </div>
  </div>

  <!-- Chat -->
  <div class="panel" id="panel-chat">
    <div class="card">
      <h2>Analytics Assistant</h2>
      <div class="chat-log" id="chat-log"></div>
      <div class="chat-input">
        <input type="text" id="chat-text" placeholder="Ask about revenue, conversions, audience…">
        <button class="btn primary" id="btn-send">Send</button>
      </div>
    </div>
  </div>

  <!-- Configuration -->
  <div class="panel" id="panel-config">
    <div class="card">
      <h2>Settings</h2>
      <div class="config-row"><label>Dashboard title</label><input type="text" data-key="general.title" id="cfg-general-title"></div>
      <div class="config-row"><label>Rows per page</label><input type="number" min="1" data-key="general.page_size" id="cfg-general-page_size"></div>
      <div class="config-row"><label>Metrics refresh (seconds)</label><input type="number" min="1" data-key="refresh.metrics_interval_secs" id="cfg-refresh-metrics_interval_secs"></div>
      <div class="config-row"><label>Assistant delay (ms)</label><input type="number" min="0" step="100" data-key="assistant.thinking_delay_ms" id="cfg-assistant-thinking_delay_ms"></div>
      <div class="config-row"><label>Default theme</label>
        <select data-key="theme.preference" id="cfg-theme-preference"><option value="light">light</option><option value="dark">dark</option></select>
      </div>
      <div class="config-row"><label>Activity log</label>
        <select data-key="logging.enabled" id="cfg-logging-enabled"><option value="true">enabled</option><option value="false">disabled</option></select>
      </div>
      <div class="btn-group">
        <button class="btn primary" id="btn-save-config">Save Configuration</button>
      </div>
      <p class="meta" style="margin-top:8px">Saved settings apply the next time the dashboard starts.</p>
    </div>
    <div class="card">
      <h2>Effective configuration</h2>
      <pre class="toml" id="config-toml"></pre>
    </div>
  </div>

</div>

<div class="toast" id="toast"></div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
const table = { search: '', status: [], platform: [], from: '', to: '', sort: null, dir: 'asc', page: 1 };
let currentPanel = 'campaigns';
let searchTimer = null;

// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(method, path, body) {
  const opts = { method, headers: {} };
  if (body !== undefined) {
    opts.headers['Content-Type'] = 'application/json';
    opts.body = JSON.stringify(body);
  }
  const res = await fetch(path, opts);
  const data = await res.json();
  if (!res.ok) throw new Error(data.error || res.statusText);
  return data;
}

function toast(msg, isError) {
  const el = document.getElementById('toast');
  el.textContent = msg;
  el.className = 'toast show' + (isError ? ' error' : '');
  setTimeout(() => el.className = 'toast', 3000);
}

function money(n) {
  return '$' + Math.round(n).toLocaleString('en-US');
}

function num(n) {
  return Number(n).toLocaleString('en-US', { maximumFractionDigits: 3 });
}

function esc(s) {
  if (s === undefined || s === null) return '';
  return String(s).replace(/&/g,'&amp;').replace(/</g,'&lt;').replace(/>/g,'&gt;').replace(/"/g,'&quot;');
}

function tableQuery() {
  const p = new URLSearchParams();
  if (table.search) p.append('search', table.search);
  table.status.forEach(s => p.append('status', s));
  table.platform.forEach(s => p.append('platform', s));
  if (table.from) p.append('from', table.from);
  if (table.to) p.append('to', table.to);
  if (table.sort) { p.append('sort', table.sort); p.append('dir', table.dir); }
  p.append('page', table.page);
  return p.toString();
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------
document.getElementById('nav').addEventListener('click', e => {
  if (e.target.tagName !== 'BUTTON') return;
  const panel = e.target.dataset.panel;
  if (!panel) return;

  document.querySelectorAll('nav button').forEach(b => b.classList.remove('active'));
  e.target.classList.add('active');
  document.querySelectorAll('.panel').forEach(p => p.classList.remove('active'));
  document.getElementById('panel-' + panel).classList.add('active');

  currentPanel = panel;
  loadPanel(panel);
});

async function loadPanel(panel) {
  switch (panel) {
    case 'campaigns': return loadCampaigns();
    case 'insights': return loadInsights();
    case 'chat': return loadChat();
    case 'config': return loadConfig();
  }
}

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------
async function loadMetrics() {
  try {
    const m = await api('GET', '/api/metrics');
    document.getElementById('stats-grid').innerHTML = m.metrics.map(c => `
      <div class="stat-card">
        <div class="label">${esc(c.title)}</div>
        <div class="value">${esc(c.display_value)}</div>
        <div class="change ${c.trend}">${c.trend === 'up' ? '▲' : c.trend === 'down' ? '▼' : '•'} ${esc(c.display_change)} <span class="flat">vs last period</span></div>
      </div>
    `).join('');
  } catch (e) {
    // KPI cards retry on the next refresh
  }
}

// ---------------------------------------------------------------------------
// Campaign table
// ---------------------------------------------------------------------------
async function loadCampaigns() {
  try {
    const d = await api('GET', '/api/campaigns?' + tableQuery());
    renderCampaigns(d);
  } catch (e) {
    toast('Failed to load campaigns: ' + e.message, true);
  }
}

function renderCampaigns(d) {
  document.getElementById('title').textContent = d.title;
  table.page = d.meta.page;

  const numeric = ['budget','spent','impressions','clicks','conversions','ctr','cpc','cpa'];
  document.getElementById('campaigns-head').innerHTML = d.columns.map(c => {
    const sorted = d.sort.field === c.key;
    const arrow = sorted ? (d.sort.direction === 'desc' ? ' ↓' : ' ↑') : '';
    const cls = (numeric.includes(c.key) ? 'num ' : '') + (sorted ? 'sorted' : '');
    return `<th class="${cls}" data-sort="${c.key}">${esc(c.label)}${arrow}</th>`;
  }).join('');

  const body = document.getElementById('campaigns-body');
  const empty = document.getElementById('campaigns-empty');
  if (d.rows.length === 0) {
    body.innerHTML = '';
    empty.style.display = 'block';
  } else {
    empty.style.display = 'none';
    body.innerHTML = d.rows.map(r => '<tr>' + r.cells.map((cell, i) => {
      const key = d.columns[i].key;
      if (key === 'status') return `<td><span class="status ${esc(cell)}">${esc(cell)}</span></td>`;
      return `<td class="${numeric.includes(key) ? 'num' : ''}">${esc(cell)}</td>`;
    }).join('') + '</tr>').join('');
  }

  renderOptions('status', d.statuses, table.status);
  renderOptions('platform', d.platforms, table.platform);
  document.getElementById('lbl-status').textContent = d.status_label;
  document.getElementById('lbl-platform').textContent = d.platform_label;

  const count = document.getElementById('filter-count');
  count.textContent = d.active_filters;
  count.style.display = d.active_filters > 0 ? 'inline' : 'none';

  document.getElementById('page-summary').textContent = d.summary;
  document.getElementById('page-label').textContent = `Page ${d.meta.page} of ${Math.max(d.meta.total_pages, 1)}`;
  document.getElementById('btn-prev').disabled = !d.meta.has_previous;
  document.getElementById('btn-next').disabled = !d.meta.has_next;
}

function renderOptions(kind, options, selected) {
  document.getElementById('menu-' + kind).innerHTML = options.map(o => `
    <label><input type="checkbox" data-kind="${kind}" value="${esc(o.value)}" ${selected.includes(o.value) ? 'checked' : ''}>
      ${esc(o.label)} <span class="count">${o.count}</span></label>
  `).join('');
}

document.getElementById('campaigns-head').addEventListener('click', e => {
  const key = e.target.dataset.sort;
  if (!key) return;
  if (table.sort === key) {
    table.dir = table.dir === 'asc' ? 'desc' : 'asc';
  } else {
    table.sort = key;
    table.dir = 'asc';
  }
  loadCampaigns();
});

document.querySelectorAll('[data-toggle]').forEach(btn => btn.addEventListener('click', e => {
  e.stopPropagation();
  const dd = document.getElementById(btn.dataset.toggle);
  const wasOpen = dd.classList.contains('open');
  document.querySelectorAll('.dropdown').forEach(d => d.classList.remove('open'));
  if (!wasOpen) dd.classList.add('open');
}));
document.addEventListener('click', e => {
  if (!e.target.closest('.dropdown')) document.querySelectorAll('.dropdown').forEach(d => d.classList.remove('open'));
});

document.querySelectorAll('.menu').forEach(menu => menu.addEventListener('change', e => {
  const kind = e.target.dataset.kind;
  if (!kind) return;
  const list = table[kind];
  const i = list.indexOf(e.target.value);
  if (e.target.checked && i < 0) list.push(e.target.value);
  if (!e.target.checked && i >= 0) list.splice(i, 1);
  table.page = 1;
  loadCampaigns();
}));

document.getElementById('f-search').addEventListener('input', e => {
  clearTimeout(searchTimer);
  searchTimer = setTimeout(() => {
    table.search = e.target.value;
    table.page = 1;
    loadCampaigns();
  }, 200);
});

['from', 'to'].forEach(k => document.getElementById('f-' + k).addEventListener('change', e => {
  table[k] = e.target.value;
  table.page = 1;
  loadCampaigns();
}));

document.getElementById('btn-clear').addEventListener('click', () => {
  Object.assign(table, { search: '', status: [], platform: [], from: '', to: '', page: 1 });
  document.getElementById('f-search').value = '';
  document.getElementById('f-from').value = '';
  document.getElementById('f-to').value = '';
  loadCampaigns();
});

document.getElementById('btn-prev').addEventListener('click', () => { table.page -= 1; loadCampaigns(); });
document.getElementById('btn-next').addEventListener('click', () => { table.page += 1; loadCampaigns(); });
document.getElementById('btn-export').addEventListener('click', () => {
  window.location = '/api/campaigns/export?' + tableQuery();
});

// ---------------------------------------------------------------------------
// Insight widgets
// ---------------------------------------------------------------------------
async function loadInsights() {
  try {
    const [p, s, a, o] = await Promise.all([
      api('GET', '/api/predictions'),
      api('GET', '/api/sentiment'),
      api('GET', '/api/anomalies'),
      api('GET', '/api/optimizations'),
    ]);
    renderPredictions(p);
    renderSentiment(s);
    renderAnomalies(a);
    renderOptimizations(o);
  } catch (e) {
    toast('Failed to load insights: ' + e.message, true);
  }
}

function renderPredictions(p) {
  const rows = [
    ['Revenue', money(p.revenue.current), money(p.revenue.predicted), p.revenue.confidence],
    ['Conversions', num(p.conversions.current), num(p.conversions.predicted), p.conversions.confidence],
    ['Users', num(p.users.current), num(p.users.predicted), p.users.confidence],
    ['Growth', p.growth.current.toFixed(1) + '%', p.growth.predicted.toFixed(1) + '%', p.growth.confidence],
  ];
  document.getElementById('predictions').innerHTML =
    '<table><tr><th>Metric</th><th class="num">Current</th><th class="num">Predicted</th><th class="num">Confidence</th></tr>' +
    rows.map(r => `<tr><td>${r[0]}</td><td class="num">${r[1]}</td><td class="num up">${r[2]}</td><td class="num">${r[3]}%</td></tr>`).join('') +
    '</table>' +
    p.insights.map(i => `
      <div class="list-item">
        <div class="title">${esc(i.title)} <span class="pill ${i.impact}">${i.impact}</span></div>
        <div>${esc(i.description)}</div>
        <div class="meta">${esc(i.kind)} · ${i.confidence}% confidence · ${esc(i.action)}</div>
      </div>`).join('');

  const max = Math.max(...p.forecast.map(f => Math.max(f.revenue, f.predicted)), 1);
  document.getElementById('forecast-chart').innerHTML = p.forecast.map(f =>
    `<div class="bar" style="height:${(f.revenue / max) * 100}%" title="${money(f.revenue)}"></div>` +
    `<div class="bar predicted" style="height:${(f.predicted / max) * 100}%" title="${money(f.predicted)}"></div>`
  ).join('');
  document.getElementById('forecast-labels').innerHTML = p.forecast.map(f => `<span>${esc(f.label)}</span>`).join('');
}

function renderSentiment(s) {
  const sc = s.scores;
  document.getElementById('sentiment').innerHTML = `
    <div class="stat-card" style="border:none;padding:0">
      <div class="label">Overall sentiment</div>
      <div class="value">${sc.overall}%</div>
      <div class="change ${sc.trend}">${sc.change > 0 ? '+' : ''}${sc.change} pts this week</div>
    </div>
    <div class="sentiment-bar">
      <div class="positive" style="width:${sc.positive}%"></div>
      <div class="neutral" style="width:${sc.neutral}%"></div>
      <div class="negative" style="width:${sc.negative}%"></div>
    </div>
    <div class="meta">Positive ${sc.positive}% · Neutral ${sc.neutral}% · Negative ${sc.negative}%</div>
    ${s.feedback.map(f => `
      <div class="list-item">
        <div class="title"><span class="pill ${f.sentiment}">${f.sentiment}</span> ${esc(f.category)}</div>
        <div>${esc(f.text)}</div>
        <div class="meta">${esc(f.source)} · ${esc(f.age)} · ${f.keywords.map(esc).join(', ')}</div>
      </div>`).join('')}
  `;
}

function renderAnomalies(a) {
  const st = a.stats;
  document.getElementById('anomaly-stats').textContent =
    `Total ${st.total} · Resolved ${st.resolved} · Active ${st.active} · False positives ${st.false_positive}`;
  document.getElementById('btn-monitoring').textContent = a.monitoring ? 'Pause' : 'Resume';

  const max = Math.max(...a.series.map(p => Math.max(p.value, p.threshold)), 1);
  document.getElementById('anomaly-chart').innerHTML = a.series.map(p =>
    `<div class="bar ${p.anomaly ? 'flagged' : ''}" style="height:${(p.value / max) * 100}%" title="${esc(p.time)}: ${p.value}"></div>`
  ).join('');

  const list = document.getElementById('anomalies');
  if (a.anomalies.length === 0) {
    list.innerHTML = '<div class="empty">No anomalies detected.</div>';
    return;
  }
  list.innerHTML = a.anomalies.map(x => `
    <div class="list-item">
      <div class="title">${esc(x.metric)} <span class="pill ${x.severity}">${x.severity}</span> <span class="pill ${x.status}">${x.status}</span></div>
      <div>${esc(x.description)}</div>
      <div class="meta">${esc(x.kind)} · value ${x.value} (normal ${esc(x.normal_range)}) · ${x.confidence}% confidence · ${esc(x.age)}</div>
      <div class="meta">${esc(x.recommendation)}</div>
      <div class="btn-group" style="margin-top:6px">
        ${x.status !== 'resolved' ? `<button class="btn small" data-anomaly="${x.id}" data-action="resolve">Resolve</button>` : ''}
        <button class="btn small danger" data-anomaly="${x.id}" data-action="dismiss">Dismiss</button>
      </div>
    </div>`).join('');
}

function renderOptimizations(o) {
  document.getElementById('optimizer-stats').textContent = `Applied ${o.applied} · Pending ${o.pending}`;
  document.getElementById('btn-auto').textContent = 'Auto: ' + (o.auto_mode ? 'on' : 'off');
  document.getElementById('optimizations').innerHTML = o.optimizations.map(x => `
    <div class="list-item">
      <div class="title">${esc(x.campaign)} <span class="pill">${x.kind}</span> <span class="pill ${x.status}">${x.status}</span></div>
      <div>${esc(x.description)}</div>
      <div class="meta">${esc(x.current_label)} → ${esc(x.suggested_label)} · ${esc(x.potential_gain)} · ${x.confidence}% confidence</div>
      ${x.status === 'pending' ? `
        <div class="btn-group" style="margin-top:6px">
          <button class="btn small primary" data-optimization="${x.id}" data-action="apply">Apply</button>
          <button class="btn small" data-optimization="${x.id}" data-action="reject">Reject</button>
        </div>` : ''}
    </div>`).join('');
}

document.getElementById('panel-insights').addEventListener('click', async e => {
  const action = e.target.dataset.action;
  if (!action) return;
  const path = e.target.dataset.anomaly
    ? `/api/anomalies/${e.target.dataset.anomaly}/${action}`
    : `/api/optimizations/${e.target.dataset.optimization}/${action}`;
  try {
    await api('POST', path);
    loadInsights();
  } catch (err) {
    toast(err.message, true);
  }
});

document.getElementById('btn-monitoring').addEventListener('click', async () => {
  await api('POST', '/api/anomalies/monitoring');
  loadInsights();
});

document.getElementById('btn-auto').addEventListener('click', async () => {
  await api('POST', '/api/optimizations/auto');
  loadInsights();
});

// ---------------------------------------------------------------------------
// Assistant
// ---------------------------------------------------------------------------
function dataLabel(key, value) {
  if (key.includes('revenue')) return money(value);
  if (key.includes('confidence')) return num(value) + '%';
  if (key.includes('gain')) return '+' + num(value) + '%';
  if (key.includes('change')) return (value > 0 ? '+' : '') + num(value) + '%';
  return num(value);
}

function renderChat(messages) {
  const log = document.getElementById('chat-log');
  log.innerHTML = messages.map(m => `
    <div class="msg ${m.role}">${esc(m.content)}
      ${m.data && m.data.length ? `<div class="data">${m.data.map(d => `<span>${esc(d.key)}: ${dataLabel(d.key, d.value)}</span>`).join('')}</div>` : ''}
      ${m.suggestions && m.suggestions.length ? `<div class="suggestions">${m.suggestions.map(s => `<button class="btn small" data-suggest="${esc(s)}">${esc(s)}</button>`).join('')}</div>` : ''}
    </div>`).join('');
  log.scrollTop = log.scrollHeight;
}

async function loadChat() {
  try {
    const d = await api('GET', '/api/chat');
    renderChat(d.messages);
  } catch (e) {
    toast('Failed to load chat: ' + e.message, true);
  }
}

async function sendChat(text) {
  if (!text.trim()) return;
  const input = document.getElementById('chat-text');
  input.value = '';
  const log = document.getElementById('chat-log');
  log.insertAdjacentHTML('beforeend', `<div class="msg user">${esc(text)}</div><div class="msg assistant thinking">Analyzing your data…</div>`);
  log.scrollTop = log.scrollHeight;
  try {
    const d = await api('POST', '/api/chat', { message: text });
    setTimeout(() => renderChat(d.messages), 1500);
  } catch (e) {
    toast(e.message, true);
  }
}

document.getElementById('btn-send').addEventListener('click', () => sendChat(document.getElementById('chat-text').value));
document.getElementById('chat-text').addEventListener('keydown', e => {
  if (e.key === 'Enter') sendChat(e.target.value);
});
document.getElementById('chat-log').addEventListener('click', e => {
  if (e.target.dataset.suggest) sendChat(e.target.dataset.suggest);
});

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------
function applyTheme(t) {
  const root = document.documentElement;
  root.className = t.root_class;
  root.style.setProperty('--bg', t.background);
  root.style.setProperty('--surface', t.surface);
  root.style.setProperty('--text', t.text);
  root.style.setProperty('--text-muted', t.muted);
  root.style.setProperty('--accent', t.accent);
  document.getElementById('btn-theme').textContent = t.preference === 'dark' ? 'Light mode' : 'Dark mode';
}

async function loadTheme() {
  try {
    applyTheme(await api('GET', '/api/theme'));
  } catch (e) {
    // Keep the built-in light palette
  }
}

document.getElementById('btn-theme').addEventListener('click', async () => {
  try {
    applyTheme(await api('PUT', '/api/theme', { toggle: true }));
  } catch (e) {
    toast('Failed to change theme: ' + e.message, true);
  }
});

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------
async function loadConfig() {
  try {
    const d = await api('GET', '/api/config');
    document.querySelectorAll('[data-key]').forEach(el => {
      const [section, key] = el.dataset.key.split('.');
      el.value = String(d.config[section][key]);
    });
    document.getElementById('config-toml').textContent = d.toml_text;
  } catch (e) {
    toast('Failed to load config: ' + e.message, true);
  }
}

document.getElementById('btn-save-config').addEventListener('click', async () => {
  const updates = [];
  document.querySelectorAll('[data-key]').forEach(el => updates.push({ key: el.dataset.key, value: el.value }));
  try {
    const result = await api('PUT', '/api/config', { updates });
    if (result.success) {
      toast('Configuration saved');
      loadConfig();
    } else {
      toast('Some settings failed: ' + result.errors.join(', '), true);
    }
  } catch (e) {
    toast('Failed to save config: ' + e.message, true);
  }
});

// ---------------------------------------------------------------------------
// Health badges
// ---------------------------------------------------------------------------
async function loadHealth() {
  try {
    const h = await api('GET', '/api/health');
    document.getElementById('health-badges').innerHTML = [
      badge('Seed ' + h.seed, 'ok'),
      badge('Config', h.config_exists ? 'ok' : 'warn'),
      badge('Activity log', h.activity_log_enabled ? 'ok' : 'warn'),
    ].join(' ');
  } catch (e) {
    // Silently ignore health badge errors
  }
}

function badge(label, cls) {
  const dot = cls === 'ok' ? '●' : cls === 'warn' ? '○' : '✕';
  return `<span class="badge ${cls}">${dot} ${esc(label)}</span>`;
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------
loadTheme();
loadHealth();
loadMetrics();
loadCampaigns();
setInterval(loadMetrics, 5000);
setInterval(() => { if (currentPanel === 'insights') loadInsights(); }, 30000);
</script>
</body>
</html>"##;
