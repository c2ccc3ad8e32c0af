//! Sample HTML fragments for testing and demonstration.
//!
//! Each fragment exercises a different group of supported tags and inline
//! styles.

/// Article with headings, paragraphs and inline emphasis.
pub fn article_template() -> &'static str {
    r##"
<h1 style="color: #1a365d">Release notes</h1>
<p>Version <b>2.4</b> ships a <i>faster</i> importer and a
   <span style="color: green; font-weight: bold">new</span> export format.</p>
<h2>Fixes</h2>
<p>Long lines   are   no longer <u>truncated</u>, and
   <s>deprecated</s> flags were removed.<br>
   See <a href="https://example.com/changelog">the changelog</a> for details.</p>
<p>Prices are shown in &euro; &amp; &pound;;&nbsp;rounding is unchanged.</p>
"##
}

/// Quotation and code block.
pub fn quote_template() -> &'static str {
    r##"
<blockquote style="padding-left: 20px">Hi <i>there</i></blockquote>
<p>Run the following:</p>
<pre>fn main() {
    println!("hello");
}</pre>
<hr>
<p><small>Last updated in <code>2024</code>.</small></p>
"##
}

/// Ordered, unordered and nested lists.
pub fn list_template() -> &'static str {
    r##"
<h3>Checklist</h3>
<ol start="3">
    <li>Prepare the input</li>
    <li>Run the <b>importer</b>
        <ul>
            <li>check warnings</li>
            <li>check errors</li>
        </ul>
    </li>
    <li>Publish</li>
</ol>
<ul>
    <li>one</li>
    <li>two</li>
</ul>
"##
}

/// Table with a header row, spans and cell styles.
pub fn table_template() -> &'static str {
    r##"
<table style="width: 400pt">
    <thead>
        <tr><th>Item</th><th>Qty</th><th>Price</th></tr>
    </thead>
    <tbody>
        <tr><td>Web Development</td><td>40</td><td style="text-align: right">$150.00</td></tr>
        <tr><td>Design Services</td><td>20</td><td style="text-align: right">$125.00</td></tr>
        <tr><td colspan="2"><b>Total</b></td><td style="background-color: #eeeeee">$8,500.00</td></tr>
    </tbody>
</table>
"##
}

/// Fragment leaning on inline CSS: colours, lengths, borders and images.
pub fn styled_template() -> &'static str {
    r##"
<div style="background-color: rgb(250, 250, 250); padding: 10px 20px; border: 1px solid #ccc">
    <p style="font-size: 14pt; line-height: 1.5; letter-spacing: 1px">Styled paragraph</p>
    <p style="font-family: monospace; color: rgba(0, 0, 0, 0.5)">Monospace text</p>
    <img src="logo.png" alt="Logo" width="120" style="height: 2cm">
    <hr style="height: 2pt; background-color: red">
    <p style="text-align: center; font-weight: 300">Light centred text</p>
</div>
"##
}

/// Minimal fragment for unit testing.
pub fn minimal_template() -> &'static str {
    "<p>Hello, World!</p>"
}

/// Fragment exercising all supported elements.
pub fn all_elements_template() -> &'static str {
    r##"
<header><h1>Heading 1</h1></header>
<section>
    <h2>Heading 2</h2>
    <h3>Heading 3</h3>
    <h4>Heading 4</h4>
    <h5>Heading 5</h5>
    <h6>Heading 6</h6>
    <p>Inline: <b>b</b> <strong>strong</strong> <i>i</i> <em>em</em> <u>u</u>
       <s>s</s> <strike>strike</strike> <del>del</del> <small>small</small>
       <sub>sub</sub> <sup>sup</sup> <mark>mark</mark> <code>code</code>
       <kbd>kbd</kbd> <samp>samp</samp> <var>var</var> <abbr>abbr</abbr>
       <q>q</q> <span>span</span> <a href="#top">a</a></p>
    <blockquote>quote</blockquote>
    <pre>  pre  formatted  </pre>
    <hr>
    <ul><li>unordered</li></ul>
    <ol><li>ordered</li></ol>
    <table><tr><th>head</th><td>cell</td></tr></table>
    <p><img src="pixel.png" alt="pixel"></p>
    <div>block<br>with break</div>
    <custom-widget>unknown tag</custom-widget>
</section>
<footer><p>Footer</p></footer>
"##
}

/// All fragments, keyed by name.
pub fn all_templates() -> [(&'static str, &'static str); 7] {
    [
        ("article", article_template()),
        ("quote", quote_template()),
        ("list", list_template()),
        ("table", table_template()),
        ("styled", styled_template()),
        ("minimal", minimal_template()),
        ("all_elements", all_elements_template()),
    ]
}
