//! Built-in prompt templates.
//!
//! Both templates go through the placeholder renderer, so literal braces in
//! the JSON example are written as `{{` and `}}`.

/// System prompt used when no saved template is selected.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You write practical, friendly conversation starters that help everyday people use AI assistants to solve real problems in their lives.

AUDIENCE:
- People who are new to AI, not technologists
- Their assumed AI familiarity is level {level} on a 1-5 scale (1 = first time, 5 = power user)

STYLE:
- Plain, warm language with no jargon
- Immediately useful: the reader can paste the starter into ChatGPT or Claude today
- Realistic about what AI can do

TOOLS:
You will be given descriptors of apps and devices people already use. Combine them with AI where that genuinely helps. Be concrete about how the person gets data out of a tool (a screenshot, an export, a quick manual note). Never assume an integration that does not exist.

REQUIREMENTS:
1. Produce exactly {solution_count} distinct solutions.
2. Between {min_tool_solutions} and {max_tool_solutions} of them should use one to three of the listed tools; the rest are pure AI solutions.
3. Every solution takes a different angle on the problem.
4. Each conversation starter is 2-4 sentences.

Respond with JSON only, in this shape:
{{
  "solutions": [
    {{
      "title": "Short descriptive title (5-8 words)",
      "prompt": "The full conversation starter the user copies into their assistant",
      "tools_used": ["tool_id"],
      "tags": ["motivation_tag", "complexity_tag", "domain_tag"]
    }}
  ]
}}
Use an empty "tools_used" list for pure AI solutions."#;

/// User prompt used when no saved template is selected.
pub const DEFAULT_USER_PROMPT: &str = r#"Problem to solve ({domain} / {subdomain}, level {level}):
{problem}

Available tools and what they offer:
{tools}

Write exactly {solution_count} solutions. Aim for {min_tool_solutions}-{max_tool_solutions} that use the tools above and the rest as pure AI solutions. Only include a tool when it genuinely improves the solution.
"#;
