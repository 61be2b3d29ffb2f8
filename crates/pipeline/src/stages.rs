//! Stage definitions for the crew pipeline.
//!
//! Each stage is a role-played LLM call: a system message describing the
//! agent (role, goal, backstory) and a user message describing the task,
//! the expected output, and the material the stage may use.

use crate::llm::Message;

/// One agent/task pair in the pipeline.
#[derive(Debug)]
pub struct Stage {
    /// Short name used in logs and error messages.
    pub name: &'static str,
    /// Section heading in the final report.
    pub title: &'static str,
    pub role: &'static str,
    /// May contain `{query}`.
    pub goal: &'static str,
    pub backstory: &'static str,
    /// May contain `{query}`.
    pub description: &'static str,
    pub expected_output: &'static str,
    /// Whether the document text is included in the prompt.
    pub reads_document: bool,
}

/// Marker the verifier must start its reply with to reject a document.
pub const REJECTION_MARKER: &str = "REJECTED";

pub const VERIFY: Stage = Stage {
    name: "verify",
    title: "Document Verification",
    role: "Financial Document Verifier",
    goal: "Validate whether the uploaded document is a financial report relevant to the \
           user's query: {query}. Check for the presence of balance sheets, income statements, \
           or structured numeric data to confirm its authenticity and suitability for further \
           analysis.",
    backstory: "You are a compliance specialist responsible for ensuring that uploaded documents \
                are authentic financial records. You pay close attention to identifying \
                structured financial content such as tables, figures, and key performance \
                indicators before allowing further processing.",
    description: "Verify whether the uploaded document contains legitimate financial content \
                  that is relevant to the user's query: {query}. Inspect its structure, figures, \
                  and tables to confirm authenticity.",
    expected_output: "A short validation report confirming whether the document is a financial \
                      report. Start the first line with VERIFIED if it is. If it is not, start \
                      the first line with REJECTED: followed by a one-line explanation why.",
    reads_document: true,
};

pub const ANALYZE: Stage = Stage {
    name: "analyze",
    title: "Financial Analysis",
    role: "Senior Financial Analyst",
    goal: "Analyze the financial document in relation to the user's query: {query}. Provide \
           insightful summaries including profitability, liquidity, growth metrics, and \
           potential market opportunities based on the data.",
    backstory: "You are an experienced financial analyst with over a decade of experience in \
                interpreting corporate financial statements, market trends, and balance sheet \
                metrics. Your analysis is precise, data-driven, and avoids speculation.",
    description: "Analyze the uploaded financial document in context of the user's query: \
                  {query}. Extract key insights such as revenue trends, profit margins, debt \
                  ratios, and liquidity indicators. Identify any anomalies or notable financial \
                  movements.",
    expected_output: "A concise 3-4 paragraph summary detailing financial performance, \
                      highlighting profitability, liquidity, and growth metrics, backed by \
                      extracted data.",
    reads_document: true,
};

pub const RECOMMEND: Stage = Stage {
    name: "recommend",
    title: "Investment Recommendations",
    role: "Investment Advisor",
    goal: "Based on the financial insights derived from the document and the user's query: \
           {query}, provide responsible and diversified investment recommendations. Ensure each \
           recommendation is backed by data and aligns with general financial prudence.",
    backstory: "You are a seasoned financial advisor with expertise in equity markets, mutual \
                funds, and long-term wealth management. You prioritize ethical investment \
                strategies, transparency, and client-specific portfolio planning.",
    description: "Using the analyst's findings, give investment considerations relevant to the \
                  user's query: {query}. Tie every point to figures from the analysis and state \
                  the assumptions behind it.",
    expected_output: "A short list of data-backed investment considerations with their \
                      rationale, followed by a one-paragraph caveat on the limits of the \
                      analysis.",
    reads_document: false,
};

pub const ASSESS_RISK: Stage = Stage {
    name: "assess_risk",
    title: "Risk Assessment",
    role: "Risk Assessment Specialist",
    goal: "Analyze the financial document and assess potential risks associated with the \
           user's query: {query}. Identify key risk areas including liquidity, credit exposure, \
           operational vulnerabilities, and market volatility. Provide actionable \
           recommendations for mitigating those risks.",
    backstory: "You are an experienced quantitative risk analyst with expertise in enterprise \
                risk management, compliance, and financial modeling. Your insights help \
                organizations anticipate and mitigate threats to capital and market stability. \
                You communicate risk clearly and responsibly.",
    description: "Assess the risks visible in the document and in the preceding recommendations, \
                  in context of the user's query: {query}. Rate each risk area and suggest \
                  mitigations grounded in the data.",
    expected_output: "A structured risk assessment covering liquidity, credit, operational, and \
                      market risk, each with a severity rating and mitigation.",
    reads_document: true,
};

/// The fixed execution order.
pub const ORDER: [&Stage; 4] = [&VERIFY, &ANALYZE, &RECOMMEND, &ASSESS_RISK];

/// Material handed to a stage besides the query.
#[derive(Debug, Default)]
pub struct StageInput<'a> {
    pub document: Option<&'a str>,
    /// Output of the previous stage.
    pub context: Option<&'a str>,
    /// Keyword notes computed from the document.
    pub notes: Option<&'a str>,
}

impl Stage {
    /// Build the chat messages for this stage.
    pub fn messages(&self, query: &str, input: &StageInput<'_>) -> Vec<Message> {
        let system = format!(
            "You are a {role}.\nYour goal: {goal}\n\n{backstory}",
            role = self.role,
            goal = self.goal.replace("{query}", query),
            backstory = self.backstory,
        );

        let mut user = format!(
            "Task: {}\n\nExpected output: {}",
            self.description.replace("{query}", query),
            self.expected_output,
        );
        if let Some(context) = input.context {
            user.push_str("\n\nFindings from the previous step:\n");
            user.push_str(context);
        }
        if let Some(notes) = input.notes {
            user.push_str("\n\nTool notes:\n");
            user.push_str(notes);
        }
        if let Some(document) = input.document.filter(|_| self.reads_document) {
            user.push_str("\n\nDocument text:\n");
            user.push_str(document);
        }

        vec![Message::system(system), Message::user(user)]
    }
}

/// Outcome of the verification stage.
#[derive(Debug, PartialEq, Eq)]
pub enum Verdict {
    Verified,
    Rejected(String),
}

impl Verdict {
    /// Interpret the verifier's reply. Only an explicit rejection on the
    /// first non-empty line stops the pipeline.
    pub fn parse(reply: &str) -> Self {
        let first = reply
            .lines()
            .map(|l| l.trim().trim_start_matches(['*', '#', '>', ' ']))
            .find(|l| !l.is_empty())
            .unwrap_or("");

        let is_rejection = first
            .get(..REJECTION_MARKER.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(REJECTION_MARKER));
        if !is_rejection {
            return Verdict::Verified;
        }

        let reason = first[REJECTION_MARKER.len()..]
            .trim_start_matches(|c: char| matches!(c, ':' | '*' | '-') || c.is_whitespace())
            .trim();
        if reason.is_empty() {
            Verdict::Rejected("the verifier gave no reason".to_string())
        } else {
            Verdict::Rejected(reason.to_string())
        }
    }
}
